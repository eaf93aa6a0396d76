//! JSON to XML: writes a [`Tree`] as a compact XML string.
//!
//! Use [`Tree::to_xml`] unless you need to write into an existing buffer.
use crate::{
    error::XmlResult,
    escape::escape,
    value::{Scalar, Tree, XmlValue},
};
use indexmap::IndexMap;
use std::fmt::Write;

impl Tree {
    /// Writes this tree as a compact XML string.
    ///
    /// # Errors
    /// Can only fail if formatting into the string fails.
    ///
    /// # Example
    /// ```rust
    /// use serde_json::json;
    /// use xmljson::{ConvertConfig, Tree};
    ///
    /// let tree = Tree::from_json(&json!({ "root": { "name": "John Doe", "age": 30 } }), &ConvertConfig::default()).unwrap();
    /// assert_eq!(tree.to_xml().unwrap(), "<root><name>John Doe</name><age>30</age></root>");
    /// ```
    pub fn to_xml(&self) -> XmlResult<String> {
        let mut buffer = String::new();
        write_xml(&mut buffer, &self.name, &self.value)?;
        Ok(buffer)
    }
}

/// Writes a named node as XML, using the given writer.
///
/// Nodes are written as follows:
/// - A sequence writes one element per item, all with the same name
/// - A leaf writes its text entity-escaped; numbers, booleans and null are written as-is
/// - A CDATA value writes its text unescaped, inside `<![CDATA[...]]>`
/// - An element with attributes writes them in order, and drops its comments (even if the attributes are empty)
/// - An element without attributes writes its comments, space-joined, as one leading comment
///
/// Elements are never self-closing. The writer is non-recursive, so deep trees are safe.
///
/// # Errors
/// This function will return an error if the writer fails.
pub fn write_xml<W: Write>(writer: &mut W, name: &str, value: &XmlValue) -> std::fmt::Result {
    let mut stack = vec![NodeTask::Open(name, value)];
    while let Some(task) = stack.pop() {
        match task {
            NodeTask::Close(name) => write!(writer, "</{name}>")?,

            NodeTask::Open(name, XmlValue::Sequence(items)) => {
                for item in items.iter().rev() {
                    stack.push(NodeTask::Open(name, item));
                }
            }

            NodeTask::Open(name, XmlValue::Leaf(scalar)) => {
                write!(writer, "<{name}>")?;
                match scalar {
                    Scalar::String(text) => writer.write_str(&escape(text))?,
                    other => write!(writer, "{other}")?,
                }
                write!(writer, "</{name}>")?;
            }

            NodeTask::Open(name, XmlValue::Cdata(cdata)) => {
                write_open_tag(writer, name, cdata.attributes.as_ref())?;
                write!(writer, "<![CDATA[{}]]></{name}>", cdata.text)?;
            }

            NodeTask::Open(name, XmlValue::Element(element)) => {
                write_open_tag(writer, name, element.attributes.as_ref())?;
                if let (None, Some(comments)) = (&element.attributes, &element.comments) {
                    write!(writer, "<!-- {} -->", comments.join(" "))?;
                }

                stack.push(NodeTask::Close(name));
                for (child_name, child) in element.children.iter().rev() {
                    stack.push(NodeTask::Open(child_name, child));
                }
            }
        }
    }

    Ok(())
}

fn write_open_tag<W: Write>(
    writer: &mut W,
    name: &str,
    attributes: Option<&IndexMap<String, String>>,
) -> std::fmt::Result {
    write!(writer, "<{name}")?;
    for (attr_name, attr_value) in attributes.into_iter().flatten() {
        write!(writer, r#" {}="{attr_value}""#, attribute_name(attr_name))?;
    }
    writer.write_char('>')
}

/// Namespace declarations are re-joined from their first two `:`-separated parts.
fn attribute_name(name: &str) -> std::borrow::Cow<'_, str> {
    match name.strip_prefix("xmlns:") {
        Some(rest) => {
            let prefix = rest.split(':').next().unwrap_or(rest);
            format!("xmlns:{prefix}").into()
        }
        None => name.into(),
    }
}

enum NodeTask<'a> {
    Open(&'a str, &'a XmlValue),
    Close(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{CdataValue, Element};

    fn write(name: &str, value: &XmlValue) -> String {
        let mut output = String::new();
        write_xml(&mut output, name, value).unwrap();
        output
    }

    #[test]
    fn test_write_leaf_escapes_text() {
        let value = XmlValue::Leaf(Scalar::from("This is a \"quoted\" text."));
        assert_eq!(write("text", &value), "<text>This is a &quot;quoted&quot; text.</text>");
    }

    #[test]
    fn test_write_non_string_leaves() {
        assert_eq!(write("n", &XmlValue::Leaf(Scalar::Number(30.into()))), "<n>30</n>");
        assert_eq!(write("b", &XmlValue::Leaf(Scalar::Bool(false))), "<b>false</b>");
        assert_eq!(write("z", &XmlValue::Leaf(Scalar::Null)), "<z>null</z>");
    }

    #[test]
    fn test_write_sequence() {
        let value = XmlValue::Sequence(vec![
            XmlValue::Leaf(Scalar::from("a")),
            XmlValue::Sequence(vec![XmlValue::Leaf(Scalar::from("b"))]),
        ]);
        assert_eq!(write("i", &value), "<i>a</i><i>b</i>");
    }

    #[test]
    fn test_write_cdata_with_attributes() {
        let mut cdata = CdataValue::new("a < b");
        cdata.attributes = Some([("lang".to_string(), "en".to_string())].into_iter().collect());
        assert_eq!(
            write("note", &XmlValue::Cdata(cdata)),
            r#"<note lang="en"><![CDATA[a < b]]></note>"#
        );
    }

    #[test]
    fn test_write_comments_only_without_attributes() {
        let mut element = Element::new();
        element.comments = Some(vec!["one".to_string(), "two".to_string()]);
        element.push_child("x", XmlValue::Leaf(Scalar::from("1")));
        assert_eq!(
            write("r", &XmlValue::Element(element.clone())),
            "<r><!-- one two --><x>1</x></r>"
        );

        element.attributes = Some([("id".to_string(), "7".to_string())].into_iter().collect());
        assert_eq!(write("r", &XmlValue::Element(element)), r#"<r id="7"><x>1</x></r>"#);
    }

    #[test]
    fn test_write_empty_attributes_still_drop_comments() {
        let mut element = Element::new();
        element.attributes = Some(IndexMap::new());
        element.comments = Some(vec!["x".to_string()]);
        assert_eq!(write("r", &XmlValue::Element(element)), "<r></r>");
    }

    #[test]
    fn test_write_empty_comment_list() {
        let mut element = Element::new();
        element.comments = Some(vec![]);
        element.push_child("a", XmlValue::Leaf(Scalar::from("1")));
        assert_eq!(write("r", &XmlValue::Element(element)), "<r><!--  --><a>1</a></r>");
    }

    #[test]
    fn test_write_empty_element_is_not_self_closing() {
        assert_eq!(write("e", &XmlValue::Element(Element::new())), "<e></e>");
    }

    #[test]
    fn test_attribute_name_normalization() {
        assert_eq!(attribute_name("xmlns:ns"), "xmlns:ns");
        assert_eq!(attribute_name("xmlns:a:b"), "xmlns:a");
        assert_eq!(attribute_name("xml:lang"), "xml:lang");
    }

    #[test]
    fn test_write_deep_tree() {
        let mut value = XmlValue::Leaf(Scalar::from("leaf"));
        for _ in 0..2_000 {
            let mut element = Element::new();
            element.children.insert("d".to_string(), value);
            value = XmlValue::Element(element);
        }

        let output = write("d", &value);
        assert!(output.starts_with("<d><d>"));
        assert!(output.ends_with("</d></d>"));
    }
}
