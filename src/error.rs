//! Error handling for XML parsing and JSON conversion
use super::{StrSpan, StringSpan};

/// Return early with an [`XmlError`] pointing into the source string.
///
/// - `bail!(src, kind)` - error at the start of the document
/// - `bail!(src, span, kind)` - error at the given span
macro_rules! bail {
    ($src:expr, $span:expr, $kind:expr) => {
        return Err($crate::error::XmlError::new(
            $kind,
            $crate::error::ErrorContext::new($src, $span),
        ))
    };

    ($src:expr, $kind:expr) => {
        bail!($src, $crate::StrSpan::default(), $kind)
    };
}

/// A result type for XML conversion, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while converting a document.
#[derive(Debug)]
pub struct XmlError {
    /// The context of the error
    pub context: Box<ErrorContext>,

    /// The kind of error that occurred
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError`
    #[must_use]
    pub fn new(kind: XmlErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Creates a new `XmlError` that has no source location, such as one raised while encoding JSON.
    #[must_use]
    pub fn without_context(kind: XmlErrorKind) -> Self {
        Self::new(kind, ErrorContext::new("", StrSpan::default()))
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
impl From<std::fmt::Error> for XmlError {
    fn from(err: std::fmt::Error) -> Self {
        Self::without_context(XmlErrorKind::Format(err))
    }
}

/// The kind of error that occurred while converting a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// The document ended before a root element was found
    #[error("No root element found")]
    NoRootElement,

    /// The JSON tree is not a single-key object naming the root element
    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    /// XML tokenization failed
    #[error("XML parser error: {0}")]
    Xml(#[from] xmlparser::Error),

    /// An entity reference could not be decoded
    #[error("Invalid entity reference: {0}")]
    Entity(String),

    /// The tree nests deeper than the configured limit
    #[error("Maximum nesting depth of {0} exceeded")]
    DepthLimitExceeded(usize),

    /// Writing the output failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Context describing the error location in the source document.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Full source of the document that was parsed, for row/col calculation.
    pub source: String,

    /// Position of the error in the source.
    pub span: StringSpan,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` with the given source, and span.
    #[must_use]
    pub fn new(source: &str, span: StrSpan) -> Self {
        Self {
            source: source.to_string(),
            span: span.into(),
        }
    }

    /// Returns the row and column of the error in the source.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.span.position(&self.source)
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.span.as_ref();
        let line = span.split('\n').next().unwrap_or(span);

        if !line.is_empty() {
            writeln!(f, "| {line}")?;
        }

        if self.span.start() > 0 {
            let (row, col) = self.position();
            writeln!(f, "= At {row}:{col}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_span() {
        let src = "<root>\n<child></nope>";
        let span = StrSpan {
            text: "</nope>",
            start: 14,
        };
        let err = XmlError::new(XmlErrorKind::NoRootElement, ErrorContext::new(src, span));

        let message = err.to_string();
        assert!(message.contains("| </nope>"));
        assert!(message.contains("= At 2:8"));
        assert!(message.contains("= No root element found"));
    }

    #[test]
    fn test_error_display_without_context() {
        let err = XmlError::without_context(XmlErrorKind::DepthLimitExceeded(4));
        assert_eq!(err.to_string(), "= Maximum nesting depth of 4 exceeded\n");
    }

    #[test]
    fn test_bail_macro_points_at_span() {
        fn fails(src: &str) -> XmlResult<()> {
            let span = StrSpan { text: "<b", start: 3 };
            bail!(src, span, XmlErrorKind::DepthLimitExceeded(1));
        }

        let err = fails("<a><b/></a>").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::DepthLimitExceeded(1)));
        assert_eq!(err.context.position(), (1, 4));
    }
}
