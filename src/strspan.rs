/// A span of a string in the input XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StrSpan<'a> {
    /// The string slice.
    pub text: &'a str,

    /// The start position of the span in the input XML.
    pub start: usize,
}
impl<'a> StrSpan<'a> {
    /// Create a span at the end of the string.
    #[must_use]
    pub fn end(str: &str) -> Self {
        let len = str.len();
        StrSpan {
            text: "",
            start: if len == 0 { 0 } else { len - 1 },
        }
    }

    /// Returns the length of the span.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Return true if len == 0
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the start position of the span in the input XML.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns this span as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Calculates the row and column of the span in the input XML.
    ///
    /// Warning: This is an expensive operation, and should be used for error reporting only.
    #[must_use]
    pub fn position(&self, source: &str) -> (usize, usize) {
        Self::position_in_text(self.start, source)
    }

    pub(crate) fn position_in_text(start: usize, source: &str) -> (usize, usize) {
        let mut row = 1;
        let mut col = 1;
        for (i, c) in source.char_indices() {
            if i == start {
                break;
            }
            if c == '\n' {
                row += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (row, col)
    }
}

//
// We need our own type since StrSpan does not expose any internals
impl<'a> From<xmlparser::StrSpan<'a>> for StrSpan<'a> {
    #[inline]
    fn from(span: xmlparser::StrSpan<'a>) -> StrSpan<'a> {
        StrSpan {
            text: span.as_str(),
            start: span.start(),
        }
    }
}

impl<'a> From<&'a str> for StrSpan<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        StrSpan { text, start: 0 }
    }
}

impl AsRef<str> for StrSpan<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.text
    }
}
impl std::fmt::Display for StrSpan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
impl PartialEq<str> for StrSpan<'_> {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}
impl PartialEq<&str> for StrSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

/// Owned variant of `StrSpan`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringSpan {
    /// The string slice.
    pub text: String,

    /// The start position of the span in the input XML.
    pub start: usize,
}
impl StringSpan {
    /// Create a new owned span
    #[must_use]
    pub fn new(text: String, start: usize) -> Self {
        StringSpan { text, start }
    }

    /// Calculates the row and column of the span in the input XML.
    ///
    /// Warning: This is an expensive operation, and should be used for error reporting only.
    #[must_use]
    pub fn position(&self, source: &str) -> (usize, usize) {
        StrSpan::position_in_text(self.start, source)
    }

    /// Returns the start position of the span in the input XML.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns this span as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}
impl From<StrSpan<'_>> for StringSpan {
    #[inline]
    fn from(span: StrSpan<'_>) -> StringSpan {
        StringSpan {
            text: span.text.to_string(),
            start: span.start,
        }
    }
}
impl AsRef<str> for StringSpan {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}
impl std::fmt::Display for StringSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strspan_position() {
        let source = "line1\nline2\nline3";
        let span = StrSpan {
            text: "line2",
            start: 6,
        };
        assert_eq!(span.position(source), (2, 1));
    }

    #[test]
    fn test_strspan_from_tokenizer() {
        let mut tokenizer = xmlparser::Tokenizer::from("<root/>");
        let Some(Ok(xmlparser::Token::ElementStart { local, .. })) = tokenizer.next() else {
            panic!("Expected an element start");
        };

        let span = StrSpan::from(local);
        assert_eq!(span, "root");
        assert_eq!(span.start(), 1);
    }

    #[test]
    fn test_string_span_position() {
        let source = "line1\nline2\nline3";
        let span = StringSpan::new("line3".to_string(), 12);
        assert_eq!(span.position(source), (3, 1));
    }

    #[test]
    fn test_strspan_is_empty() {
        let empty_span = StrSpan { text: "", start: 0 };
        let non_empty_span = StrSpan {
            text: "text",
            start: 0,
        };
        assert!(empty_span.is_empty());
        assert!(!non_empty_span.is_empty());
    }
}
