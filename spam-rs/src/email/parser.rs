use crate::error::Result;
use std::path::Path;
use tracing::debug;

use super::types::EmailParts;

/// Header/body boundary: two consecutive newlines
pub const SEPARATOR: &str = "\n\n";

/// Raw email splitter
pub struct EmailParser;

impl EmailParser {
    /// Read an email file and split it into headers and body
    pub fn parse_file(path: &Path) -> Result<EmailParts> {
        let raw = std::fs::read(path)?;
        let parts = get_parts(&raw);
        if parts.body.is_none() {
            debug!("No header/body separator in {}", path.display());
        }
        Ok(parts)
    }

    /// Split raw email bytes into headers and body
    pub fn parse(raw: &[u8]) -> EmailParts {
        let text = decode_lossy(raw);
        Self::split_headers_body(&text)
    }

    /// Split at the first blank line
    fn split_headers_body(message: &str) -> EmailParts {
        match message.find(SEPARATOR) {
            Some(pos) => EmailParts {
                headers: message[..pos].to_string(),
                body: Some(message[pos + SEPARATOR.len()..].to_string()),
            },
            None => EmailParts {
                headers: message.to_string(),
                body: None,
            },
        }
    }
}

/// Split raw email bytes into headers and body.
///
/// Undecodable byte sequences are dropped. When the text has no blank line
/// only the header part is populated.
pub fn get_parts(raw: &[u8]) -> EmailParts {
    EmailParser::parse(raw)
}

/// Decode UTF-8, dropping invalid byte sequences instead of failing
pub fn decode_lossy(raw: &[u8]) -> String {
    let mut text = String::with_capacity(raw.len());
    for chunk in raw.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_headers_body() {
        let parts = get_parts(b"From: test@example.com\nSubject: Test\n\nBody content");
        assert_eq!(parts.headers, "From: test@example.com\nSubject: Test");
        assert_eq!(parts.body.as_deref(), Some("Body content"));
        assert_eq!(parts.part_count(), 2);
    }

    #[test]
    fn test_split_at_first_separator_only() {
        let text = "Subject: a\n\nfirst paragraph\n\nsecond paragraph";
        let parts = get_parts(text.as_bytes());
        assert_eq!(parts.headers, "Subject: a");
        assert_eq!(
            parts.body.as_deref(),
            Some("first paragraph\n\nsecond paragraph")
        );
    }

    #[test]
    fn test_split_is_lossless() {
        let samples = [
            "a\n\nb",
            "\n\nbody only",
            "headers only\n\n",
            "h1\nh2\n\n\n\nb1\n\nb2\n",
            "Subject: caf\u{e9}\n\n\u{2603} snow",
        ];
        for text in samples {
            let parts = get_parts(text.as_bytes());
            let body = parts.body.clone().expect("separator present");
            assert_eq!(format!("{}{}{}", parts.headers, SEPARATOR, body), text);
            assert_eq!(parts.combined(), text);
        }
    }

    #[test]
    fn test_no_separator_yields_single_part() {
        let parts = get_parts(b"From: a@b.c\nSubject: no body\n");
        assert_eq!(parts.part_count(), 1);
        assert!(parts.body.is_none());
        assert_eq!(parts.headers, "From: a@b.c\nSubject: no body\n");
        assert_eq!(parts.body_or_empty(), "");
    }

    #[test]
    fn test_crlf_is_not_a_separator() {
        let parts = get_parts(b"From: a@b.c\r\n\r\nBody");
        assert!(parts.body.is_none());
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        let raw = b"Subject: caf\xe9\n\nbody \xff\xfeok";
        let parts = get_parts(raw);
        assert_eq!(parts.headers, "Subject: caf");
        assert_eq!(parts.body.as_deref(), Some("body ok"));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("00001.abc");
        std::fs::write(&path, b"Subject: hi\n\nhello").unwrap();

        let parts = EmailParser::parse_file(&path).unwrap();
        assert_eq!(parts.headers, "Subject: hi");
        assert_eq!(parts.body.as_deref(), Some("hello"));
    }
}
