//! # xmljson
//!
//! Converts between JSON trees and XML documents, in both directions.
//!
//! A single JSON shape carries everything XML can express, using three reserved keys:
//! - `_attributes` - a mapping of attribute names to values
//! - `_cdata` - the content of a CDATA section
//! - `_comments` - comments preceding the element's other content
//!
//! Repeated sibling elements become arrays, and every tree is wrapped in a single-key
//! object naming the root element.
//!
//! ```rust
//! use serde_json::json;
//! use xmljson::{json_to_xml, xml_to_json};
//!
//! let tree = json!({
//!     "person": {
//!         "_attributes": { "id": "1" },
//!         "name": "John",
//!         "tag": ["a", "b"]
//!     }
//! });
//!
//! let xml = json_to_xml(&tree).unwrap();
//! assert_eq!(xml, r#"<person id="1"><name>John</name><tag>a</tag><tag>b</tag></person>"#);
//!
//! let decoded = xml_to_json(&xml).unwrap();
//! assert_eq!(decoded, tree);
//! ```
//!
//! Parsing is lenient: unclosed tags are closed for you, rather than rejected.
//! See [`Document`] for the exact recovery rules.
#![warn(missing_docs)]

#[macro_use]
mod error;
pub use error::{ErrorContext, XmlError, XmlErrorKind, XmlResult};

mod strspan;
pub use strspan::{StrSpan, StringSpan};

pub mod node;
pub use node::{
    CdataNode, Node, NodeAttribute, NodeName, ProcessingInstructionNode, TagNode, TextNode,
};

mod document;
pub use document::Document;

mod config;
pub use config::{ConvertConfig, DEFAULT_MAX_DEPTH};

pub mod escape;

mod value;
pub use value::{
    ATTRIBUTES_KEY, CDATA_KEY, COMMENTS_KEY, CdataValue, Element, Scalar, Tree, XmlValue,
    is_reserved_key,
};

mod decode;
mod encode;
pub use encode::write_xml;

use serde_json::Value;
use tracing::{debug, instrument};

/// Converts a JSON tree into a compact XML string, using the default [`ConvertConfig`].
///
/// The tree must be an object; its first key names the root element.
///
/// # Errors
/// Returns an error if the root is not a non-empty object, or the tree nests too deeply.
pub fn json_to_xml(value: &Value) -> XmlResult<String> {
    json_to_xml_with_config(value, &ConvertConfig::default())
}

/// Converts a JSON tree into a compact XML string.
///
/// # Errors
/// Returns an error if the root is not a non-empty object, or the tree nests deeper than `config.max_depth`.
#[instrument(skip_all)]
pub fn json_to_xml_with_config(value: &Value, config: &ConvertConfig) -> XmlResult<String> {
    let tree = Tree::from_json(value, config)?;
    let xml = tree.to_xml()?;

    debug!(root = %tree.name, len = xml.len(), "Encoded JSON tree as XML");
    Ok(xml)
}

/// Converts an XML string into a JSON tree, using the default [`ConvertConfig`].
///
/// # Errors
/// Returns an error if the document has no root element, or nests too deeply.
pub fn xml_to_json(xml: &str) -> XmlResult<Value> {
    xml_to_json_with_config(xml, &ConvertConfig::default())
}

/// Converts an XML string into a JSON tree.
///
/// # Errors
/// Returns an error if the document has no root element, or nests deeper than `config.max_depth`.
#[instrument(skip_all)]
pub fn xml_to_json_with_config(xml: &str, config: &ConvertConfig) -> XmlResult<Value> {
    let tree = Tree::from_xml(xml, config)?;

    debug!(root = %tree.name, len = xml.len(), "Decoded XML document as JSON");
    Ok(tree.to_json())
}
