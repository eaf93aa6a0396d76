//! Entity escaping for XML output, and entity decoding for parsed input.
//!
//! Escaping only ever produces the five predefined XML entities.
//! Decoding understands the full HTML named set, plus decimal and hex references.
use crate::error::{XmlError, XmlErrorKind, XmlResult};
use htmlentity::entity::{ICodedDataTrait, decode};
use std::borrow::Cow;

/// Characters that must be replaced in XML text.
const RESERVED: [char; 5] = ['&', '<', '>', '"', '\''];

/// Replaces `& < > " '` with their named entities.
///
/// Borrows the input when there is nothing to replace.
///
/// ```rust
/// use xmljson::escape::escape;
/// assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(RESERVED) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

/// Decodes entity references in raw XML text.
///
/// Borrows the input when it contains no references.
///
/// Decoding is lenient: the whole HTML named set is accepted, not just the five XML entities,
/// so `&copy;` decodes to `©` even though no DTD declares it.
///
/// ```rust
/// use xmljson::escape::unescape;
/// assert_eq!(unescape("&lt;a&gt; &#38; &#x27;b&apos;").unwrap(), "<a> & 'b'");
/// assert_eq!(unescape("&copy; 2024").unwrap(), "© 2024");
/// ```
///
/// # Errors
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn unescape(text: &str) -> XmlResult<Cow<'_, str>> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }

    let decoded = decode(text.as_bytes())
        .to_string()
        .map_err(|e| XmlError::without_context(XmlErrorKind::Entity(e.to_string())))?;
    Ok(Cow::Owned(decoded))
}
