//! Child MIME parts and their headers

use mailparse::{parse_content_disposition, ParsedContentDisposition};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// RFC 2231 `attribute-char`s left unencoded in extended parameter values
const ATTRIBUTE_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Format a `filename` parameter
///
/// Names that cannot sit inside a quoted string unchanged (separators,
/// quotes, backslashes, controls, non-ASCII) use the RFC 2231 extended form.
fn filename_param(filename: &str) -> String {
    let quotable = filename
        .chars()
        .all(|c| (c.is_ascii_graphic() || c == ' ') && !matches!(c, '"' | '\\' | ';'));

    if quotable {
        format!("filename=\"{filename}\"")
    } else {
        format!("filename*=UTF-8''{}", utf8_percent_encode(filename, ATTRIBUTE_CHAR))
    }
}

/// Ordered header list with case-insensitive lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set a header, replacing any existing value with the same name
    pub fn insert(&mut self, name: &str, value: &str) {
        match self
            .0
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    /// Raw value of a header
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether a header is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parsed `Content-Disposition` header, if present
    #[must_use]
    pub fn content_disposition(&self) -> Option<ParsedContentDisposition> {
        self.get(CONTENT_DISPOSITION).map(parse_content_disposition)
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A child part of an outgoing message
///
/// Parts carrying a `Content-Disposition` header are delivered as file
/// attachments; all others are ignored by the Office 365 transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimePart {
    /// Part headers
    pub headers: Headers,

    /// Content type of the part body
    pub content_type: String,

    /// Raw (decoded) body bytes
    pub body: Vec<u8>,
}

impl MimePart {
    /// Create a part without a `Content-Disposition` header
    #[must_use]
    pub fn new(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: Headers::new(),
            content_type: content_type.to_string(),
            body: body.into(),
        }
    }

    /// Create an `attachment` part with a filename
    #[must_use]
    pub fn attachment(filename: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(content_type, body).disposition("attachment", filename)
    }

    /// Create an `inline` part with a filename
    #[must_use]
    pub fn inline(filename: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(content_type, body).disposition("inline", filename)
    }

    /// Add or replace a header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    fn disposition(self, kind: &str, filename: &str) -> Self {
        self.header(CONTENT_DISPOSITION, &format!("{kind}; {}", filename_param(filename)))
    }

    /// Look up a parameter of the `Content-Disposition` header
    #[must_use]
    pub fn disposition_param(&self, param: &str) -> Option<String> {
        self.headers
            .content_disposition()
            .and_then(|cd| cd.params.get(&param.to_ascii_lowercase()).cloned())
    }

    /// The `filename` parameter of the `Content-Disposition` header
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        self.disposition_param("filename")
    }
}
