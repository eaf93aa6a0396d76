//! The types of nodes that can appear in a parsed XML document.
use super::StrSpan;

mod name;
pub use name::*;

mod text;
pub use text::*;

mod tag;
pub use tag::*;

mod pi;
pub use pi::*;

mod cdata;
pub use cdata::*;

/// A child node in the document tree. Can be any of:
/// - `Element` - a tag node
/// - `Text` - a text node
/// - `Comment` - a comment node
/// - `ProcessingInstruction` - a processing instruction node
/// - `Cdata` - a CDATA node
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'src> {
    /// A tag node.
    Element(TagNode<'src>),

    /// A text node.
    Text(TextNode<'src>),

    /// A comment node, with its raw text.
    Comment(StrSpan<'src>),

    /// A processing instruction node.
    ProcessingInstruction(ProcessingInstructionNode<'src>),

    /// A CDATA node.
    Cdata(CdataNode<'src>),
}
impl<'src> Node<'src> {
    /// Returns the tag node, if this is an element.
    #[must_use]
    pub fn as_element(&self) -> Option<&TagNode<'src>> {
        match self {
            Self::Element(node) => Some(node),
            _ => None,
        }
    }
}
