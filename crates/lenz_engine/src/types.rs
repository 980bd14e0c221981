use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Built-in API endpoint used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://contents-lenz.onrender.com";

/// Form fields sent with every summarize call. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryParams {
    pub length: String,
    pub format: String,
    pub language: String,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            length: "medium".to_string(),
            format: "paragraph".to_string(),
            language: "auto".to_string(),
        }
    }
}

/// Content source of a summarize call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryInput {
    Text(String),
    File(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub title: String,
    pub content: String,
    #[serde(rename = "sourceUrl", alias = "url")]
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
    #[serde(
        rename = "detectedLanguage",
        alias = "detected_language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detected_language: Option<String>,
    #[serde(
        rename = "detectedLanguageName",
        alias = "detected_language_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detected_language_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct KeywordsReply {
    pub(crate) keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LanguageReply {
    pub(crate) language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Single failure shape for every remote and host operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected before any request was sent.
    InvalidInput,
    Timeout,
    Network,
    HttpStatus(u16),
    /// Error payload reported by the API, or relayed across the bridge.
    Api,
    Decode,
    Io,
    Dialog,
    UnknownOperation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Api => write!(f, "api error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Dialog => write!(f, "dialog error"),
            FailureKind::UnknownOperation => write!(f, "unknown operation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scraped_page_reads_api_shape_and_writes_bridge_shape() {
        let page: ScrapedPage = serde_json::from_str(
            r#"{"title":"T","content":"C","url":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(page.source_url, "https://example.com");
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["sourceUrl"], "https://example.com");
    }

    #[test]
    fn summary_language_fields_are_optional() {
        let summary: Summary = serde_json::from_str(r#"{"summary":"hi"}"#).unwrap();
        assert_eq!(summary.detected_language, None);
        let summary: Summary = serde_json::from_str(
            r#"{"summary":"hi","detected_language":"en","detected_language_name":"English"}"#,
        )
        .unwrap();
        assert_eq!(summary.detected_language_name.as_deref(), Some("English"));
    }
}
