use crate::StrSpan;

/// The name of a node, with an optional prefix:
/// `prefix:local`
#[derive(Debug, Clone, Copy)]
pub struct NodeName<'src> {
    prefix: Option<StrSpan<'src>>,
    local: StrSpan<'src>,
}
impl<'src> NodeName<'src> {
    /// Build a name from tokenizer spans. An empty prefix means the name has none.
    pub(crate) fn new<T: Into<StrSpan<'src>>>(prefix: T, local: T) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            local: local.into(),
        }
    }

    /// Compare the name with a prefix and local name.
    #[must_use]
    pub fn equals(&self, prefix: Option<&str>, local: &str) -> bool {
        self.prefix.map(|s| s.as_str()) == prefix && self.local.as_str() == local
    }

    /// Returns the prefix of the node name.
    #[must_use]
    pub fn prefix(&self) -> Option<&StrSpan<'src>> {
        self.prefix.as_ref()
    }

    /// Returns the local portion of the node name.
    #[must_use]
    pub fn local(&self) -> &StrSpan<'src> {
        &self.local
    }
}
impl std::fmt::Display for NodeName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}:{local}", local = self.local)
        } else {
            write!(f, "{local}", local = self.local)
        }
    }
}
impl PartialEq for NodeName<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other.prefix.map(|s| s.as_str()), other.local.as_str())
    }
}
impl PartialEq<&str> for NodeName<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.to_string().as_str() == *other
    }
}
impl PartialEq<str> for NodeName<'_> {
    fn eq(&self, other: &str) -> bool {
        self.to_string().as_str() == other
    }
}
