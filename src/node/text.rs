use std::borrow::Cow;

/// A span of text inside a node of the document tree.
///
/// Whitespace-only runs are kept as text nodes, and entity references are decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode<'src> {
    /// The decoded text of the node (untrimmed)
    text: Cow<'src, str>,
}
impl<'src> TextNode<'src> {
    /// Create a new text node.
    pub(crate) fn new(text: Cow<'src, str>) -> Self {
        Self { text }
    }

    /// Returns the decoded text of the node.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
