use crate::StrSpan;

/// A processing instruction node:
/// `<?target content?>`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstructionNode<'src> {
    target: StrSpan<'src>,
    content: Option<StrSpan<'src>>,
}
impl<'src> ProcessingInstructionNode<'src> {
    /// Create a new processing instruction node.
    pub(crate) fn new<T: Into<StrSpan<'src>>>(target: T, content: Option<T>) -> Self {
        Self {
            target: target.into(),
            content: content.map(Into::into),
        }
    }

    /// Returns the target of the processing instruction.
    #[must_use]
    pub fn target(&self) -> &StrSpan<'src> {
        &self.target
    }

    /// Returns the content of the processing instruction.
    #[must_use]
    pub fn content(&self) -> Option<&StrSpan<'src>> {
        self.content.as_ref()
    }
}
