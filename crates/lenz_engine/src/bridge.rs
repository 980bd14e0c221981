//! Host-side gateway: the only place the UI context can reach the API,
//! the file system or host dialogs. Requests and replies are plain JSON.
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::persist::write_atomically;
use crate::{
    ApiClient, ApiError, FailureKind, FileSelection, HostDialogs, SaveOutcome, SettingsStore,
    StoredSettings, SummaryParams, SUPPORTED_UI_LANGUAGES,
};

pub const DEFAULT_EXPORT_FORMAT: &str = ".txt";
const DEFAULT_KEYWORD_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum BridgeRequest {
    GetApiStatus,
    ScrapeUrl {
        url: String,
        #[serde(default = "default_true")]
        use_ai_filter: bool,
    },
    SummarizeText {
        text: String,
        #[serde(default)]
        options: SummaryParams,
    },
    SummarizeFile {
        path: PathBuf,
        #[serde(default)]
        options: SummaryParams,
    },
    SummarizeUrl {
        url: String,
        #[serde(default)]
        options: SummaryParams,
    },
    ExtractKeywords {
        text: String,
        #[serde(default = "default_keyword_count")]
        count: u32,
        #[serde(default = "default_output_language")]
        language: String,
    },
    DetectLanguage {
        text: String,
    },
    SelectFile,
    SaveFile {
        content: String,
        #[serde(default = "default_suggested_name")]
        suggested_name: String,
    },
    GetSettings,
    SaveSettings(StoredSettings),
    /// Re-points the API client. A missing or blank `apiUrl` restores the startup endpoint.
    SetApiUrl {
        #[serde(default)]
        api_url: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

fn default_keyword_count() -> u32 {
    DEFAULT_KEYWORD_COUNT
}

fn default_output_language() -> String {
    "auto".to_string()
}

fn default_suggested_name() -> String {
    format!("summary{DEFAULT_EXPORT_FORMAT}")
}

impl BridgeRequest {
    pub const OPERATIONS: [&'static str; 12] = [
        "getApiStatus",
        "scrapeUrl",
        "summarizeText",
        "summarizeFile",
        "summarizeUrl",
        "extractKeywords",
        "detectLanguage",
        "selectFile",
        "saveFile",
        "getSettings",
        "saveSettings",
        "setApiUrl",
    ];

    const UNIT_OPERATIONS: [&'static str; 3] = ["getApiStatus", "selectFile", "getSettings"];

    pub fn parse(op: &str, payload: Value) -> Result<Self, BridgeError> {
        if !Self::OPERATIONS.contains(&op) {
            return Err(BridgeError::UnknownOperation(op.to_string()));
        }
        let empty = match &payload {
            Value::Null => true,
            Value::Object(fields) => fields.is_empty() && Self::UNIT_OPERATIONS.contains(&op),
            _ => false,
        };
        let envelope = if empty {
            json!({ "op": op })
        } else {
            json!({ "op": op, "payload": payload })
        };
        serde_json::from_value(envelope).map_err(|err| BridgeError::InvalidPayload {
            op: op.to_string(),
            reason: err.to_string(),
        })
    }

    /// Split back into the `(op, payload)` pair `BridgeGateway::invoke` takes.
    pub fn to_parts(&self) -> Result<(String, Value), BridgeError> {
        let mut envelope = serde_json::to_value(self).map_err(|err| BridgeError::InvalidPayload {
            op: self.op_name().to_string(),
            reason: err.to_string(),
        })?;
        let payload = envelope
            .get_mut("payload")
            .map(Value::take)
            .unwrap_or(Value::Null);
        Ok((self.op_name().to_string(), payload))
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            BridgeRequest::GetApiStatus => "getApiStatus",
            BridgeRequest::ScrapeUrl { .. } => "scrapeUrl",
            BridgeRequest::SummarizeText { .. } => "summarizeText",
            BridgeRequest::SummarizeFile { .. } => "summarizeFile",
            BridgeRequest::SummarizeUrl { .. } => "summarizeUrl",
            BridgeRequest::ExtractKeywords { .. } => "extractKeywords",
            BridgeRequest::DetectLanguage { .. } => "detectLanguage",
            BridgeRequest::SelectFile => "selectFile",
            BridgeRequest::SaveFile { .. } => "saveFile",
            BridgeRequest::GetSettings => "getSettings",
            BridgeRequest::SaveSettings(_) => "saveSettings",
            BridgeRequest::SetApiUrl { .. } => "setApiUrl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("invalid payload for {op}: {reason}")]
    InvalidPayload { op: String, reason: String },
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        let kind = match err {
            BridgeError::UnknownOperation(_) => FailureKind::UnknownOperation,
            BridgeError::InvalidPayload { .. } => FailureKind::InvalidInput,
        };
        ApiError::new(kind, err.to_string())
    }
}

/// `{"error": message}`, the failure shape of every bridge reply.
pub fn error_reply(message: &str) -> Value {
    json!({ "error": message })
}

pub struct BridgeGateway {
    client: Arc<dyn ApiClient>,
    dialogs: Arc<dyn HostDialogs>,
    settings: SettingsStore,
    /// Endpoint restored when saved settings carry no `apiUrl`.
    fallback_base_url: String,
}

impl BridgeGateway {
    pub fn new(
        client: Arc<dyn ApiClient>,
        dialogs: Arc<dyn HostDialogs>,
        settings: SettingsStore,
        fallback_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            dialogs,
            settings,
            fallback_base_url: fallback_base_url.into(),
        }
    }

    pub async fn invoke(&self, op: &str, payload: Value) -> Value {
        let request = match BridgeRequest::parse(op, payload) {
            Ok(request) => request,
            Err(err) => {
                engine_warn!("Bridge rejected request: {err}");
                return error_reply(&err.to_string());
            }
        };
        engine_debug!("Bridge op {op}");

        let outcome = AssertUnwindSafe(self.dispatch(request))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                engine_warn!("Bridge op {op} failed ({}): {}", err.kind, err.message);
                error_reply(&err.message)
            }
            Err(_) => {
                engine_error!(
                    "Bridge op {op} panicked (last request id {})",
                    engine_logging::last_request_id()
                );
                error_reply(&format!("{op} failed unexpectedly"))
            }
        }
    }

    async fn dispatch(&self, request: BridgeRequest) -> Result<Value, ApiError> {
        match request {
            BridgeRequest::GetApiStatus => {
                let info = self.client.status().await?;
                Ok(json!({ "connected": true, "data": info }))
            }
            BridgeRequest::ScrapeUrl { url, use_ai_filter } => {
                to_reply(&self.client.scrape_url(&url, use_ai_filter).await?)
            }
            BridgeRequest::SummarizeText { text, options } => {
                to_reply(&self.client.summarize_text(&text, &options).await?)
            }
            BridgeRequest::SummarizeFile { path, options } => {
                to_reply(&self.client.summarize_file(&path, &options).await?)
            }
            BridgeRequest::SummarizeUrl { url, options } => {
                to_reply(&self.client.summarize_url(&url, &options).await?)
            }
            BridgeRequest::ExtractKeywords {
                text,
                count,
                language,
            } => {
                let keywords = self.client.extract_keywords(&text, count, &language).await?;
                Ok(json!({ "keywords": keywords }))
            }
            BridgeRequest::DetectLanguage { text } => {
                let language = self.client.detect_language(&text).await?;
                Ok(json!({ "language": language }))
            }
            BridgeRequest::SelectFile => {
                let path = self
                    .dialogs
                    .pick_file_to_open()
                    .await
                    .map_err(|err| ApiError::new(FailureKind::Dialog, err.to_string()))?;
                to_reply(&FileSelection {
                    canceled: path.is_none(),
                    path,
                })
            }
            BridgeRequest::SaveFile {
                content,
                suggested_name,
            } => {
                let outcome = match self.save_file(&content, &suggested_name).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        engine_warn!("Saving export failed ({}): {}", err.kind, err.message);
                        SaveOutcome {
                            canceled: false,
                            saved_path: None,
                            error: Some(err.message),
                        }
                    }
                };
                to_reply(&outcome)
            }
            BridgeRequest::GetSettings => to_reply(&self.settings.load()),
            BridgeRequest::SaveSettings(settings) => {
                if !SUPPORTED_UI_LANGUAGES.contains(&settings.language.as_str()) {
                    return Err(ApiError::new(
                        FailureKind::InvalidInput,
                        format!("unsupported language: {}", settings.language),
                    ));
                }
                let previous = self.settings.load();
                self.settings
                    .save(&settings)
                    .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
                // An unchanged endpoint leaves a startup override in place.
                if previous.api_url != settings.api_url {
                    let endpoint = settings
                        .api_url
                        .as_deref()
                        .unwrap_or(&self.fallback_base_url);
                    self.client.set_base_url(endpoint);
                }
                to_reply(&settings)
            }
            BridgeRequest::SetApiUrl { api_url } => {
                let endpoint = api_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(&self.fallback_base_url);
                self.client.set_base_url(endpoint);
                Ok(json!({ "apiUrl": self.client.base_url() }))
            }
        }
    }

    async fn save_file(&self, content: &str, suggested_name: &str) -> Result<SaveOutcome, ApiError> {
        let Some(target) = self
            .dialogs
            .pick_save_destination(suggested_name)
            .await
            .map_err(|err| ApiError::new(FailureKind::Dialog, err.to_string()))?
        else {
            engine_info!("Export canceled");
            return Ok(SaveOutcome {
                canceled: true,
                saved_path: None,
                error: None,
            });
        };
        let saved = export_to(self.client.as_ref(), content, &target).await?;
        Ok(SaveOutcome {
            canceled: false,
            saved_path: Some(saved),
            error: None,
        })
    }
}

/// Export `content` through the API in the format implied by `target`'s extension and write it.
pub(crate) async fn export_to(
    client: &dyn ApiClient,
    content: &str,
    target: &Path,
) -> Result<PathBuf, ApiError> {
    let format = export_format(target);
    let bytes = client.export_summary(content, &format).await?;
    let saved = write_atomically(target, &bytes)
        .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
    engine_info!("Exported {} bytes to {}", bytes.len(), saved.display());
    Ok(saved)
}

fn export_format(target: &Path) -> String {
    target
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXPORT_FORMAT.to_string())
}

fn to_reply<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}
