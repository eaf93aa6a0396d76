//! The typed node model shared by both directions, and its mapping to JSON.
//!
//! In JSON, the kind of a node is implied by reserved keys. Here it is explicit,
//! and the reserved keys are read exactly once, in [`XmlValue::from_json`].
use crate::{
    ConvertConfig,
    error::{XmlError, XmlErrorKind, XmlResult},
};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "_attributes";

/// Key holding the content of a CDATA section.
pub const CDATA_KEY: &str = "_cdata";

/// Key holding an element's comments.
pub const COMMENTS_KEY: &str = "_comments";

/// Returns true for keys that describe XML structure instead of naming a child element.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    matches!(key, ATTRIBUTES_KEY | CDATA_KEY | COMMENTS_KEY)
}

/// A primitive leaf value.
///
/// Decoding only ever produces strings; the other variants come from JSON input.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text, which is entity-escaped on output
    String(String),

    /// A number, written in its JSON form
    Number(Number),

    /// A boolean, written as `true` or `false`
    Bool(bool),

    /// Null, written as `null`
    Null,
}
impl Scalar {
    /// Returns the JSON form of this scalar.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}
impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}
impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// An element whose only content is a CDATA section:
/// `<name attrs><![CDATA[text]]></name>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CdataValue {
    /// Attributes, in insertion order. `None` when the attributes key was absent.
    pub attributes: Option<IndexMap<String, String>>,

    /// Raw content of the section. Never escaped.
    pub text: String,
}
impl CdataValue {
    /// Create a CDATA value without attributes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            attributes: None,
            text: text.into(),
        }
    }
}

/// An element with attributes, comments, and named children.
///
/// Children keep document order. A name seen more than once holds an [`XmlValue::Sequence`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Attributes, in insertion order. `None` when the element has no attributes key.
    ///
    /// An empty map still counts as present, and suppresses comments on output.
    pub attributes: Option<IndexMap<String, String>>,

    /// Comments, in document order. `None` when the element has no comments key.
    pub comments: Option<Vec<String>>,

    /// Child elements, keyed by tag name.
    pub children: IndexMap<String, XmlValue>,
}
impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child element.
    ///
    /// If a child with the same name exists, the two are merged into a sequence;
    /// further repeats are appended to it.
    pub fn push_child(&mut self, name: impl Into<String>, value: XmlValue) {
        let name = name.into();
        match self.children.get_mut(&name) {
            Some(XmlValue::Sequence(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, XmlValue::Sequence(vec![]));
                *existing = XmlValue::Sequence(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }
}

/// A node of the tree, on either side of the conversion:
/// - `Leaf` - an element holding only text: `<name>text</name>`
/// - `Cdata` - an element holding only a CDATA section
/// - `Element` - an element with attributes, comments and children
/// - `Sequence` - sibling elements sharing one name
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    /// An element holding only text.
    Leaf(Scalar),

    /// An element holding only a CDATA section.
    Cdata(CdataValue),

    /// An element with attributes, comments and children.
    Element(Element),

    /// Repeated sibling elements, in document order.
    Sequence(Vec<XmlValue>),
}
impl XmlValue {
    /// Builds a node from its JSON form.
    ///
    /// Reserved keys are resolved in this order:
    /// - `_cdata` makes the node a [`CdataValue`]; `_attributes` are kept, children and `_comments` are dropped
    /// - otherwise the node is an [`Element`], keeping `_attributes`, `_comments` and every other key as a child
    ///
    /// Presence is what counts, not content:
    /// - `_attributes` that is empty, or not an object, still suppresses comments on output
    /// - `_comments` may be an array or a single value; an empty array writes an empty comment
    ///
    /// # Errors
    /// Returns an error if objects and arrays nest deeper than `config.max_depth`.
    pub fn from_json(value: &Value, config: &ConvertConfig) -> XmlResult<Self> {
        Self::from_json_at(value, config.max_depth, 1)
    }

    fn from_json_at(value: &Value, max_depth: usize, depth: usize) -> XmlResult<Self> {
        if matches!(value, Value::Object(_) | Value::Array(_)) && depth > max_depth {
            return Err(XmlError::without_context(
                XmlErrorKind::DepthLimitExceeded(max_depth),
            ));
        }

        let map = match value {
            Value::Object(map) => map,
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| Self::from_json_at(item, max_depth, depth + 1))
                    .collect::<XmlResult<_>>()?;
                return Ok(Self::Sequence(items));
            }
            Value::String(s) => return Ok(Self::Leaf(Scalar::String(s.clone()))),
            Value::Number(n) => return Ok(Self::Leaf(Scalar::Number(n.clone()))),
            Value::Bool(b) => return Ok(Self::Leaf(Scalar::Bool(*b))),
            Value::Null => return Ok(Self::Leaf(Scalar::Null)),
        };

        let attributes = map.get(ATTRIBUTES_KEY).map(|attrs| match attrs {
            Value::Object(attrs) => attrs
                .iter()
                .map(|(name, value)| (name.clone(), json_text(value)))
                .collect(),
            _ => IndexMap::new(),
        });

        if let Some(cdata) = map.get(CDATA_KEY) {
            return Ok(Self::Cdata(CdataValue {
                attributes,
                text: json_text(cdata),
            }));
        }

        let comments = map.get(COMMENTS_KEY).map(|comments| match comments {
            Value::Array(items) => items.iter().map(json_text).collect(),
            comment => vec![json_text(comment)],
        });

        let mut children = IndexMap::with_capacity(map.len());
        for (name, child) in map.iter().filter(|(name, _)| !is_reserved_key(name)) {
            children.insert(name.clone(), Self::from_json_at(child, max_depth, depth + 1)?);
        }

        Ok(Self::Element(Element {
            attributes,
            comments,
            children,
        }))
    }

    /// Returns the JSON form of this node.
    ///
    /// `_attributes` and `_comments` are only present when the node carries them, even if empty.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Leaf(scalar) => scalar.to_json(),

            Self::Cdata(cdata) => {
                let mut map = Map::new();
                if let Some(attributes) = &cdata.attributes {
                    map.insert(ATTRIBUTES_KEY.to_string(), attributes_json(attributes));
                }
                map.insert(CDATA_KEY.to_string(), Value::String(cdata.text.clone()));
                Value::Object(map)
            }

            Self::Element(element) => {
                let mut map = Map::new();
                if let Some(attributes) = &element.attributes {
                    map.insert(ATTRIBUTES_KEY.to_string(), attributes_json(attributes));
                }
                if let Some(comments) = &element.comments {
                    let comments = comments.iter().cloned().map(Value::String);
                    map.insert(COMMENTS_KEY.to_string(), Value::Array(comments.collect()));
                }
                for (name, child) in &element.children {
                    map.insert(name.clone(), child.to_json());
                }
                Value::Object(map)
            }

            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// A complete tree: the root element's name, and its content.
///
/// In JSON this is a single-key object: `{ "root": { ... } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// The root element's tag name.
    pub name: String,

    /// The root element's content.
    pub value: XmlValue,
}
impl Tree {
    /// Create a new tree.
    pub fn new(name: impl Into<String>, value: XmlValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Builds a tree from its JSON form.
    ///
    /// The first key of the object names the root element. Any further keys are ignored.
    ///
    /// # Errors
    /// Returns an error if `value` is not an object with at least one key, or nests too deeply.
    pub fn from_json(value: &Value, config: &ConvertConfig) -> XmlResult<Self> {
        let Value::Object(map) = value else {
            return Err(XmlError::without_context(XmlErrorKind::InvalidRoot(
                format!("expected an object, found {}", json_kind(value)),
            )));
        };

        let mut entries = map.iter();
        let Some((name, root)) = entries.next() else {
            return Err(XmlError::without_context(XmlErrorKind::InvalidRoot(
                "the object has no keys".to_string(),
            )));
        };

        if entries.len() > 0 {
            debug!(root = %name, ignored = entries.len(), "Ignoring extra top-level keys");
        }

        Ok(Self::new(name.clone(), XmlValue::from_json(root, config)?))
    }

    /// Returns the JSON form of this tree.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.name.clone(), self.value.to_json());
        Value::Object(map)
    }
}

/// Text for a value interpolated into markup: strings as-is, anything else as JSON.
fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn attributes_json(attributes: &IndexMap<String, String>) -> Value {
    let map = attributes
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(map)
}
