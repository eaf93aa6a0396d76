use super::{Node, NodeName};
use crate::StrSpan;
use std::borrow::Cow;

/// A node in the document tree, with a name, attributes, and children:
/// `<name attr="value">...</name>`
///
/// Duplicate attributes are kept, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TagNode<'src> {
    span: StrSpan<'src>,
    name: NodeName<'src>,
    attributes: Vec<NodeAttribute<'src>>,
    children: Vec<Node<'src>>,
}
impl<'src> TagNode<'src> {
    pub(crate) fn new(span: impl Into<StrSpan<'src>>, name: NodeName<'src>) -> Self {
        Self {
            span: span.into(),
            name,
            attributes: vec![],
            children: vec![],
        }
    }

    pub(crate) fn push_child(&mut self, child: Node<'src>) {
        self.children.push(child);
    }

    pub(crate) fn push_attribute(&mut self, attribute: NodeAttribute<'src>) {
        self.attributes.push(attribute);
    }

    /// Removes and returns every child, leaving the node empty.
    pub(crate) fn take_children(&mut self) -> Vec<Node<'src>> {
        std::mem::take(&mut self.children)
    }

    /// Get the span of the opening tag in the input.
    #[must_use]
    pub fn span(&self) -> &StrSpan<'src> {
        &self.span
    }

    /// Get the name of the node.
    #[must_use]
    pub fn name(&self) -> &NodeName<'src> {
        &self.name
    }

    /// Get the attributes of the node, in source order.
    #[must_use]
    pub fn attributes(&self) -> &[NodeAttribute<'src>] {
        &self.attributes
    }

    /// Get the children of the node, in source order.
    #[must_use]
    pub fn children(&self) -> &[Node<'src>] {
        &self.children
    }
}

/// An attribute set on a node, with a name and value:
/// `name="value"`
///
/// The value has its entity references decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttribute<'src> {
    name: NodeName<'src>,
    value: Cow<'src, str>,
}
impl<'src> NodeAttribute<'src> {
    pub(crate) fn new(name: NodeName<'src>, value: Cow<'src, str>) -> Self {
        Self { name, value }
    }

    /// Returns the name of the attribute.
    #[must_use]
    pub fn name(&self) -> &NodeName<'src> {
        &self.name
    }

    /// Returns the decoded value of the attribute.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
