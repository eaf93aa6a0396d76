use crate::{
    ConvertConfig, StrSpan,
    error::{ErrorContext, XmlError, XmlErrorKind, XmlResult},
    escape::unescape,
    node::{CdataNode, Node, NodeAttribute, NodeName, ProcessingInstructionNode, TagNode, TextNode},
};
use std::borrow::Cow;
use tracing::warn;
use xmlparser::{ElementEnd, Token};

/// An XML document that has been parsed into a tree. It is deliberately lenient with invalid XML.
/// Strings in the tree borrow from the source string, unless entity decoding had to allocate.
///
/// Only the root element is kept; the XML declaration, DTD, and any comments or processing
/// instructions outside the root are skipped.
///
/// Inside the root, the child list mirrors what a DOM would hold:
/// - Whitespace-only text is kept as a text node
/// - Text and attribute values have their entity references decoded
/// - Comments and CDATA sections keep their raw text
///
/// Malformed markup is recovered from, rather than rejected:
/// - A closing tag that matches an open ancestor closes every element above it.
///   Each of those unclosed elements ends up empty; its children move to its parent, just before it.
/// - A closing tag that matches no open element is ignored.
/// - Elements still open at the end of the input are closed where they stand.
/// - Malformed markup after the root element has started ends the document at that point.
/// - Anything after the root element is closed is ignored.
///
/// # Example
/// ```rust
/// use xmljson::Document;
///
/// let doc = Document::parse("<root><person><name>John Doe</name></root>").unwrap();
/// let names: Vec<String> = doc
///     .root
///     .children()
///     .iter()
///     .filter_map(|child| child.as_element())
///     .map(|child| child.name().to_string())
///     .collect();
///
/// assert_eq!(names, ["name", "person"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'src> {
    /// The root of the tree.
    pub root: TagNode<'src>,
}
impl<'src> Document<'src> {
    /// Parses a document from the given source string, using the default [`ConvertConfig`].
    ///
    /// # Errors
    /// Returns an error if no root element can be found, or the elements nest too deeply.
    pub fn parse(src: &'src str) -> XmlResult<Self> {
        Self::parse_with_config(src, &ConvertConfig::default())
    }

    /// Parses a document from the given source string.
    ///
    /// # Errors
    /// Returns an error if no root element can be found, or the elements nest deeper than `config.max_depth`.
    pub fn parse_with_config(src: &'src str, config: &ConvertConfig) -> XmlResult<Self> {
        let tokenizer = xmlparser::Tokenizer::from(src);
        let mut builder = TreeBuilder::new(src, config.max_depth);
        let mut state = ParserState::Prolog;

        for next in tokenizer {
            let next = match next {
                Ok(token) => token,
                Err(e) if state == ParserState::Prolog => {
                    bail!(src, XmlErrorKind::Xml(e));
                }
                Err(e) => {
                    warn!(error = %e, "Malformed markup; ending the document here");
                    break;
                }
            };

            //
            // At this point, next is significant.
            match state {
                ParserState::Prolog => {
                    // Declarations, DTDs, comments and PIs before the root are not kept
                    if let Token::ElementStart {
                        prefix,
                        local,
                        span,
                    } = next
                    {
                        builder.open(span.into(), NodeName::new(prefix, local))?;
                        state = ParserState::TagAttributes;
                    }
                }

                ParserState::TagAttributes => match next {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        ..
                    } => {
                        let value = decode_text(src, value.into())?;
                        let attr = NodeAttribute::new(NodeName::new(prefix, local), value);
                        builder.push_attribute(attr);
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Open,
                        ..
                    } => {
                        state = ParserState::TagChildren;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Empty,
                        ..
                    } => {
                        state = builder.close_top();
                    }

                    _ => {}
                },

                ParserState::TagChildren => match next {
                    Token::ElementStart {
                        prefix,
                        local,
                        span,
                    } => {
                        builder.open(span.into(), NodeName::new(prefix, local))?;
                        state = ParserState::TagAttributes;
                    }

                    Token::Text { text } => {
                        let decoded = decode_text(src, text.into())?;
                        builder.push_child(Node::Text(TextNode::new(decoded)));
                    }

                    Token::Cdata { text, .. } => {
                        builder.push_child(Node::Cdata(CdataNode::new(text)));
                    }

                    Token::Comment { text, .. } => {
                        builder.push_child(Node::Comment(text.into()));
                    }

                    Token::ProcessingInstruction { target, content, .. } => {
                        let pi = ProcessingInstructionNode::new(target, content);
                        builder.push_child(Node::ProcessingInstruction(pi));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        span,
                    } => {
                        state = builder.close_named(NodeName::new(prefix, local), span.into());
                    }

                    _ => {}
                },

                ParserState::Epilog => {
                    if let Token::ElementStart { span, .. } = next {
                        let (line, column) = StrSpan::from(span).position(src);
                        warn!(line, column, "Ignoring element after the root element");
                    }
                }
            }
        }

        builder.finish()
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
enum ParserState {
    Prolog,
    TagAttributes,
    TagChildren,
    Epilog,
}

/// Holds the open elements while the token stream is walked.
struct TreeBuilder<'src> {
    src: &'src str,
    max_depth: usize,
    stack: Vec<TagNode<'src>>,
    root: Option<TagNode<'src>>,
}
impl<'src> TreeBuilder<'src> {
    fn new(src: &'src str, max_depth: usize) -> Self {
        Self {
            src,
            max_depth,
            stack: vec![],
            root: None,
        }
    }

    fn open(&mut self, span: StrSpan<'src>, name: NodeName<'src>) -> XmlResult<()> {
        if self.stack.len() >= self.max_depth {
            bail!(
                self.src,
                span,
                XmlErrorKind::DepthLimitExceeded(self.max_depth)
            );
        }

        self.stack.push(TagNode::new(span, name));
        Ok(())
    }

    fn push_attribute(&mut self, attribute: NodeAttribute<'src>) {
        if let Some(node) = self.stack.last_mut() {
            node.push_attribute(attribute);
        }
    }

    fn push_child(&mut self, child: Node<'src>) {
        if let Some(node) = self.stack.last_mut() {
            node.push_child(child);
        }
    }

    /// Closes the innermost open element, for `<tag/>`.
    fn close_top(&mut self) -> ParserState {
        if let Some(node) = self.stack.pop() {
            self.attach(node);
        }
        self.next_state()
    }

    /// Closes the innermost open element with the given name, for `</tag>`.
    fn close_named(&mut self, name: NodeName<'src>, span: StrSpan<'src>) -> ParserState {
        let Some(position) = self.stack.iter().rposition(|node| *node.name() == name) else {
            let (line, column) = span.position(self.src);
            warn!(
                tag = %name,
                line,
                column,
                "Ignoring closing tag with no matching open element"
            );
            return self.next_state();
        };

        while self.stack.len() > position + 1 {
            let Some(mut unclosed) = self.stack.pop() else {
                break;
            };

            let (line, column) = unclosed.span().position(self.src);
            warn!(
                tag = %unclosed.name(),
                line,
                column,
                closed_by = %name,
                "Closing unclosed element; moving its children to its parent"
            );

            let children = unclosed.take_children();
            if let Some(parent) = self.stack.last_mut() {
                for child in children {
                    parent.push_child(child);
                }
                parent.push_child(Node::Element(unclosed));
            }
        }

        self.close_top()
    }

    fn attach(&mut self, node: TagNode<'src>) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(Node::Element(node)),
            None => self.root = Some(node),
        }
    }

    fn next_state(&self) -> ParserState {
        if self.root.is_some() {
            ParserState::Epilog
        } else {
            ParserState::TagChildren
        }
    }

    fn finish(mut self) -> XmlResult<Document<'src>> {
        while let Some(node) = self.stack.pop() {
            let (line, column) = node.span().position(self.src);
            warn!(tag = %node.name(), line, column, "Closing element left open at end of input");
            self.attach(node);
        }

        match self.root {
            Some(root) => Ok(Document { root }),
            None => bail!(self.src, StrSpan::end(self.src), XmlErrorKind::NoRootElement),
        }
    }
}

/// Decodes the entity references in a text or attribute value, pointing errors at its span.
fn decode_text<'src>(src: &'src str, span: StrSpan<'src>) -> XmlResult<Cow<'src, str>> {
    unescape(span.as_str()).map_err(|e| XmlError::new(e.kind, ErrorContext::new(src, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_names(node: &TagNode<'_>) -> Vec<String> {
        node.children()
            .iter()
            .filter_map(Node::as_element)
            .map(|child| child.name().to_string())
            .collect()
    }

    #[test]
    fn test_parse_simple_document() {
        let doc = Document::parse("<test><test2>test</test2></test>").unwrap();
        assert_eq!(doc.root.name(), &"test");
        assert_eq!(doc.root.children().len(), 1);

        let Some(Node::Element(child)) = doc.root.children().first() else {
            panic!("Expected an element child");
        };
        let Some(Node::Text(text)) = child.children().first() else {
            panic!("Expected a text child");
        };
        assert_eq!(text.text(), "test");
    }

    #[test]
    fn test_parse_skips_declaration_and_prolog() {
        let src = "<?xml version=\"1.0\"?><!-- Comment --><!DOCTYPE root><root></root><?pi?>";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.root.name(), &"root");
        assert!(doc.root.children().is_empty());
    }

    #[test]
    fn test_parse_keeps_whitespace_text() {
        let doc = Document::parse("<root>\n  <a/>\n</root>").unwrap();
        assert_eq!(doc.root.children().len(), 3);
        assert!(matches!(doc.root.children()[0], Node::Text(_)));
    }

    #[test]
    fn test_parse_attributes_and_namespaces() {
        let src = r#"<ns:person xmlns:ns="http://example.com" id="a &amp; b"/>"#;
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.root.name().to_string(), "ns:person");

        let attrs = doc.root.attributes();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name().to_string(), "xmlns:ns");
        assert_eq!(attrs[0].value(), "http://example.com");

        assert_eq!(attrs[1].name(), &"id");
        assert_eq!(attrs[1].value(), "a & b");
    }

    #[test]
    fn test_parse_comments_cdata_and_pi() {
        let doc = Document::parse("<r><!-- c --><![CDATA[<x>]]><?pi data?></r>").unwrap();
        let children = doc.root.children();
        assert!(matches!(&children[0], Node::Comment(text) if *text == " c "));
        assert!(matches!(&children[1], Node::Cdata(cdata) if *cdata.content() == "<x>"));
        assert!(matches!(&children[2], Node::ProcessingInstruction(pi) if *pi.target() == "pi"));
    }

    #[test]
    fn test_recover_unclosed_child() {
        let doc = Document::parse("<root><person><name>John Doe</name></root>").unwrap();
        assert_eq!(element_names(&doc.root), ["name", "person"]);

        let person = doc.root.children()[1].as_element().unwrap();
        assert!(person.children().is_empty());
    }

    #[test]
    fn test_recover_stray_closing_tag() {
        let doc = Document::parse("<root><a>x</a></b></root>").unwrap();
        assert_eq!(element_names(&doc.root), ["a"]);
    }

    #[test]
    fn test_recover_unclosed_at_eof() {
        let doc = Document::parse("<root><a><b/>").unwrap();
        assert_eq!(element_names(&doc.root), ["a"]);

        let a = doc.root.children()[0].as_element().unwrap();
        assert_eq!(element_names(a), ["b"]);
    }

    #[test]
    fn test_ignores_content_after_root() {
        let doc = Document::parse("<root/><!-- trailing -->").unwrap();
        assert_eq!(doc.root.name(), &"root");
    }

    #[test]
    fn test_no_root_element() {
        let err = Document::parse("<!-- only a comment -->").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::NoRootElement));

        let err = Document::parse("").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::NoRootElement));
    }

    #[test]
    fn test_garbage_before_root() {
        let err = Document::parse("not xml at all").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::Xml(_)));
    }

    #[test]
    fn test_depth_limit() {
        let config = ConvertConfig::default().with_max_depth(2);
        assert!(Document::parse_with_config("<a><b/></a>", &config).is_ok());

        let err = Document::parse_with_config("<a><b><c/></b></a>", &config).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::DepthLimitExceeded(2)));
    }
}
