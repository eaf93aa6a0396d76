//! XML to JSON: folds a parsed [`Document`] into a [`Tree`].
use crate::{
    ConvertConfig, Document,
    error::XmlResult,
    node::{Node, TagNode},
    value::{CdataValue, Element, Scalar, Tree, XmlValue},
};

impl Tree {
    /// Parses an XML string into a tree.
    ///
    /// # Errors
    /// Returns an error if the document has no root element, or nests deeper than `config.max_depth`.
    pub fn from_xml(xml: &str, config: &ConvertConfig) -> XmlResult<Self> {
        let document = Document::parse_with_config(xml, config)?;
        Ok(Self::from_document(&document))
    }

    /// Folds a parsed document into a tree.
    #[must_use]
    pub fn from_document(document: &Document<'_>) -> Self {
        Self::new(document.root.name().to_string(), decode_tag(&document.root))
    }
}

/// Recursion is bounded by the depth limit the document was parsed with.
fn decode_tag(tag: &TagNode<'_>) -> XmlValue {
    //
    // A lone text or CDATA child collapses the whole element; attributes and comments are lost
    match tag.children() {
        [Node::Text(text)] => {
            return XmlValue::Leaf(Scalar::String(text.text().trim().to_string()));
        }
        [Node::Cdata(cdata)] => {
            return XmlValue::Cdata(CdataValue::new(cdata.content().as_str().trim()));
        }
        _ => {}
    }

    let mut element = Element::new();
    if !tag.attributes().is_empty() {
        let attributes = tag
            .attributes()
            .iter()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()));
        element.attributes = Some(attributes.collect());
    }

    // Text mixed in with other nodes is dropped
    for child in tag.children() {
        match child {
            Node::Comment(text) => element
                .comments
                .get_or_insert_with(Vec::new)
                .push(text.as_str().trim().to_string()),
            Node::Element(child) => element.push_child(child.name().to_string(), decode_tag(child)),
            Node::Text(_) | Node::Cdata(_) | Node::ProcessingInstruction(_) => {}
        }
    }

    XmlValue::Element(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> XmlValue {
        Tree::from_xml(xml, &ConvertConfig::default()).unwrap().value
    }

    #[test]
    fn test_lone_text_collapses_to_leaf() {
        assert_eq!(
            decode(r#"<a id="1"><!-- gone? -->  </a>"#),
            XmlValue::Element(Element {
                attributes: Some([("id".to_string(), "1".to_string())].into_iter().collect()),
                comments: Some(vec!["gone?".to_string()]),
                children: Default::default(),
            })
        );
        assert_eq!(decode(r#"<a id="1"> hi </a>"#), XmlValue::Leaf(Scalar::from("hi")));
    }

    #[test]
    fn test_lone_cdata_is_trimmed() {
        assert_eq!(
            decode("<a><![CDATA[  x < y  ]]></a>"),
            XmlValue::Cdata(CdataValue::new("x < y"))
        );
    }

    #[test]
    fn test_whitespace_between_children_is_dropped() {
        let XmlValue::Element(element) = decode("<a>\n  <b>1</b>\n  <c/>\n</a>") else {
            panic!("Expected an element");
        };
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children["b"], XmlValue::Leaf(Scalar::from("1")));
        assert_eq!(element.children["c"], XmlValue::Element(Element::new()));
    }

    #[test]
    fn test_mixed_text_is_dropped() {
        let XmlValue::Element(element) = decode("<a>text<b>1</b>more</a>") else {
            panic!("Expected an element");
        };
        assert_eq!(element.children.keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_lone_comment_is_kept() {
        let XmlValue::Element(element) = decode("<a><!-- note --></a>") else {
            panic!("Expected an element");
        };
        assert_eq!(element.comments, Some(vec!["note".to_string()]));
        assert_eq!(element.attributes, None);
    }

    #[test]
    fn test_tree_from_document() {
        let document = Document::parse("<ns:root xmlns:ns=\"urn:x\"/>").unwrap();
        let tree = Tree::from_document(&document);
        assert_eq!(tree.name, "ns:root");
    }
}
