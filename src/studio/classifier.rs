//! Turns raw failure text into what the error dialog shows.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

pub const RATE_LIMIT_DOCS_URL: &str = "https://ai.google.dev/gemini-api/docs/rate-limits";

const RATE_LIMIT_TEXT: &str = "You've exceeded your current API quota (Rate Limit). \
This is a usage limit on Google's servers.\n\n\
Please check your plan and billing details, or try again after some time. \
For more information, visit the ";
const RATE_LIMIT_LINK_TEXT: &str = "Gemini API rate limits documentation";

static MESSAGE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""message":\s*"(.*?)""#).expect("message pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ErrorPresentation {
    Text(String),
    /// Explanatory text followed by a documentation link.
    Linked {
        text: String,
        link_text: String,
        url: String,
        trailer: String,
    },
}

impl ErrorPresentation {
    pub fn text(message: impl Into<String>) -> Self {
        ErrorPresentation::Text(message.into())
    }

    pub fn rate_limited() -> Self {
        ErrorPresentation::Linked {
            text: RATE_LIMIT_TEXT.to_string(),
            link_text: RATE_LIMIT_LINK_TEXT.to_string(),
            url: RATE_LIMIT_DOCS_URL.to_string(),
            trailer: ".".to_string(),
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ErrorPresentation::Linked { url, .. } if url == RATE_LIMIT_DOCS_URL)
    }
}

impl fmt::Display for ErrorPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPresentation::Text(message) => f.write_str(message),
            ErrorPresentation::Linked {
                text,
                link_text,
                url,
                trailer,
            } => write!(f, "{}{} <{}>{}", text, link_text, url, trailer),
        }
    }
}

/// Classifies a raw failure message. Never fails.
///
/// Rate-limit errors (both `429` and `RESOURCE_EXHAUSTED` present) win over
/// everything else. Otherwise the first `"message": "..."` fragment is
/// shown, and failing that the raw text as is.
pub fn classify(raw: &str) -> ErrorPresentation {
    if raw.contains("429") && raw.contains("RESOURCE_EXHAUSTED") {
        return ErrorPresentation::rate_limited();
    }

    if let Some(message) = MESSAGE_FIELD
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|m| !m.is_empty())
    {
        return ErrorPresentation::text(message);
    }

    ErrorPresentation::text(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_takes_precedence() {
        let raw = r#"got status: 429 Too Many Requests. {"error":{"code":429,"message":"Quota exceeded for metric","status":"RESOURCE_EXHAUSTED"}}"#;
        let presentation = classify(raw);
        assert_eq!(presentation, ErrorPresentation::rate_limited());
        assert!(presentation.is_rate_limit());
    }

    #[test]
    fn test_rate_limit_substrings_in_either_order() {
        assert!(classify("RESOURCE_EXHAUSTED then 429").is_rate_limit());
        assert!(classify("x429yRESOURCE_EXHAUSTEDz").is_rate_limit());
    }

    #[test]
    fn test_rate_limit_needs_both_markers() {
        assert_eq!(classify("status 429"), ErrorPresentation::text("status 429"));
        assert_eq!(
            classify("RESOURCE_EXHAUSTED"),
            ErrorPresentation::text("RESOURCE_EXHAUSTED")
        );
    }

    #[test]
    fn test_extracts_first_message_field() {
        let raw = r#"{"error":{"message": "foo"}, "details":{"message":"bar"}}"#;
        assert_eq!(classify(raw), ErrorPresentation::text("foo"));
    }

    #[test]
    fn test_extracts_message_from_service_error() {
        let raw = r#"got status: 400 Bad Request. {"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            classify(raw),
            ErrorPresentation::text("API key not valid. Please pass a valid API key.")
        );
    }

    #[test]
    fn test_falls_back_to_raw_message() {
        let raw = "error sending request for url (https://example.invalid)";
        assert_eq!(classify(raw), ErrorPresentation::text(raw));
        assert_eq!(classify(""), ErrorPresentation::text(""));
    }

    #[test]
    fn test_empty_message_field_falls_back() {
        let raw = r#"{"message": ""}"#;
        assert_eq!(classify(raw), ErrorPresentation::text(raw));
    }

    #[test]
    fn test_display_includes_link() {
        let shown = ErrorPresentation::rate_limited().to_string();
        assert!(shown.starts_with("You've exceeded your current API quota (Rate Limit)."));
        assert!(shown.contains("Gemini API rate limits documentation <https://ai.google.dev/gemini-api/docs/rate-limits>."));
    }
}
