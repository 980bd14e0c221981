use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{KeywordsReply, LanguageReply};
use crate::{ApiError, FailureKind, ScrapedPage, Summary, SummaryParams, DEFAULT_API_URL};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            // Summaries of long documents routinely take close to a minute.
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Remote summarization API, one method per endpoint.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn status(&self) -> Result<Value, ApiError>;
    async fn scrape_url(&self, url: &str, use_ai_filter: bool) -> Result<ScrapedPage, ApiError>;
    async fn summarize_text(&self, text: &str, params: &SummaryParams)
        -> Result<Summary, ApiError>;
    async fn summarize_file(&self, path: &Path, params: &SummaryParams)
        -> Result<Summary, ApiError>;
    async fn summarize_url(&self, url: &str, params: &SummaryParams) -> Result<Summary, ApiError>;
    async fn extract_keywords(
        &self,
        text: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<String>, ApiError>;
    async fn detect_language(&self, text: &str) -> Result<String, ApiError>;
    /// Rendered document bytes for `summary` in the format named by a file extension.
    async fn export_summary(&self, summary: &str, format: &str) -> Result<Vec<u8>, ApiError>;

    fn base_url(&self) -> String;
    fn set_base_url(&self, base_url: &str);
}

/// Prefix `https://` when the address carries no scheme.
pub fn normalize_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::new(FailureKind::InvalidInput, "URL is required"));
    }
    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    url::Url::parse(&candidate)
        .map_err(|err| ApiError::new(FailureKind::InvalidInput, format!("invalid URL: {err}")))?;
    Ok(candidate)
}

fn trim_base(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

fn require_text(text: &str, what: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::new(
            FailureKind::InvalidInput,
            format!("{what} is required"),
        ));
    }
    Ok(())
}

pub struct ReqwestApiClient {
    base_url: RwLock<String>,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: RwLock::new(trim_base(&settings.base_url)),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let endpoint = self.endpoint(path);
        engine_debug!("POST {endpoint} (form, {} fields)", fields.len());
        let response = self
            .client
            .post(&endpoint)
            .form(fields)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn post_multipart(&self, path: &str, form: Form) -> Result<reqwest::Response, ApiError> {
        let endpoint = self.endpoint(path);
        engine_debug!("POST {endpoint} (multipart)");
        self.client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn status(&self) -> Result<Value, ApiError> {
        let endpoint = self.endpoint("/");
        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        Ok(serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    async fn scrape_url(&self, url: &str, use_ai_filter: bool) -> Result<ScrapedPage, ApiError> {
        let url = normalize_url(url)?;
        let filter = if use_ai_filter { "true" } else { "false" };
        self.post_form("/scrape-url", &[("url", url.as_str()), ("use_ai_filter", filter)])
            .await
    }

    async fn summarize_text(
        &self,
        text: &str,
        params: &SummaryParams,
    ) -> Result<Summary, ApiError> {
        require_text(text, "text")?;
        self.post_form(
            "/summarize/text",
            &[
                ("text", text),
                ("length", params.length.as_str()),
                ("format", params.format.as_str()),
                ("language", params.language.as_str()),
            ],
        )
        .await
    }

    async fn summarize_file(
        &self,
        path: &Path,
        params: &SummaryParams,
    ) -> Result<Summary, ApiError> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| ApiError::new(FailureKind::InvalidInput, "file is required"))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::new(FailureKind::Io, format!("{}: {err}", path.display())))?;
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename))
            .text("length", params.length.clone())
            .text("format", params.format.clone())
            .text("language", params.language.clone());
        let response = self.post_multipart("/summarize/file", form).await?;
        decode_json(response).await
    }

    async fn summarize_url(&self, url: &str, params: &SummaryParams) -> Result<Summary, ApiError> {
        let url = normalize_url(url)?;
        self.post_form(
            "/summarize/url",
            &[
                ("url", url.as_str()),
                ("length", params.length.as_str()),
                ("format", params.format.as_str()),
                ("language", params.language.as_str()),
            ],
        )
        .await
    }

    async fn extract_keywords(
        &self,
        text: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<String>, ApiError> {
        require_text(text, "text")?;
        let count = count.to_string();
        let reply: KeywordsReply = self
            .post_form(
                "/keywords/text",
                &[("text", text), ("count", count.as_str()), ("language", language)],
            )
            .await?;
        Ok(reply.keywords)
    }

    async fn detect_language(&self, text: &str) -> Result<String, ApiError> {
        require_text(text, "text")?;
        let reply: LanguageReply = self.post_form("/detect-language", &[("text", text)]).await?;
        Ok(reply.language)
    }

    async fn export_summary(&self, summary: &str, format: &str) -> Result<Vec<u8>, ApiError> {
        require_text(summary, "summary")?;
        let form = Form::new()
            .text("summary", summary.to_string())
            .text("format", format.to_string());
        let response = self.post_multipart("/download", form).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        Ok(body.to_vec())
    }

    fn base_url(&self) -> String {
        self.base_url
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_base_url(&self, base_url: &str) {
        let trimmed = trim_base(base_url);
        engine_info!("API endpoint set to {trimmed}");
        *self
            .base_url
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = trimmed;
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }
    let value: Value = serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
    if let Some(message) = value.get("error").and_then(describe) {
        return Err(ApiError::new(FailureKind::Api, message));
    }
    serde_json::from_value(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

/// Message for a non-2xx reply: `detail`, then `error`, then the status line.
fn error_from_body(status: reqwest::StatusCode, body: &[u8]) -> ApiError {
    let reported = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
        value
            .get("detail")
            .and_then(describe)
            .or_else(|| value.get("error").and_then(describe))
    });
    ApiError::new(
        FailureKind::HttpStatus(status.as_u16()),
        reported.unwrap_or_else(|| status.to_string()),
    )
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        // FastAPI validation errors arrive as a list of objects.
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
