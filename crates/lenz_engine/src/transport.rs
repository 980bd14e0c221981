use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::engine_debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bridge::{export_to, BridgeGateway, BridgeRequest};
use crate::types::{KeywordsReply, LanguageReply};
use crate::{
    ApiClient, ApiError, FailureKind, FileSelection, HostDialogs, SaveOutcome, ScrapedPage,
    SettingsStore, StoredSettings, Summary, SummaryInput, SummaryParams,
};

/// Capabilities the UI context may use. Every call resolves to a value or an `ApiError`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn api_status(&self) -> Result<(), ApiError>;
    async fn scrape_url(&self, url: &str, use_ai_filter: bool) -> Result<ScrapedPage, ApiError>;
    async fn summarize(
        &self,
        input: &SummaryInput,
        params: &SummaryParams,
    ) -> Result<Summary, ApiError>;
    async fn extract_keywords(
        &self,
        text: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<String>, ApiError>;
    async fn detect_language(&self, text: &str) -> Result<String, ApiError>;
    /// `Ok(None)` when the dialog was dismissed.
    async fn select_file(&self) -> Result<Option<PathBuf>, ApiError>;
    /// `Ok(None)` when the dialog was dismissed.
    async fn save_file(
        &self,
        content: &str,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, ApiError>;
    async fn load_settings(&self) -> Result<StoredSettings, ApiError>;
    async fn save_settings(&self, settings: &StoredSettings) -> Result<(), ApiError>;
    /// `None` restores the endpoint chosen at startup.
    async fn set_base_url(&self, api_url: Option<&str>) -> Result<(), ApiError>;
}

/// Sends every call through the gateway as a JSON request.
pub struct BridgeTransport {
    gateway: Arc<BridgeGateway>,
}

impl BridgeTransport {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self { gateway }
    }

    async fn call<T: DeserializeOwned>(&self, request: BridgeRequest) -> Result<T, ApiError> {
        let (op, payload) = request.to_parts()?;
        let reply = self.gateway.invoke(&op, payload).await;
        decode_reply(reply)
    }
}

fn decode_reply<T: DeserializeOwned>(reply: Value) -> Result<T, ApiError> {
    if let Some(message) = reply.get("error").and_then(Value::as_str) {
        return Err(ApiError::new(FailureKind::Api, message));
    }
    serde_json::from_value(reply).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

#[async_trait::async_trait]
impl Transport for BridgeTransport {
    async fn api_status(&self) -> Result<(), ApiError> {
        let _: Value = self.call(BridgeRequest::GetApiStatus).await?;
        Ok(())
    }

    async fn scrape_url(&self, url: &str, use_ai_filter: bool) -> Result<ScrapedPage, ApiError> {
        self.call(BridgeRequest::ScrapeUrl {
            url: url.to_string(),
            use_ai_filter,
        })
        .await
    }

    async fn summarize(
        &self,
        input: &SummaryInput,
        params: &SummaryParams,
    ) -> Result<Summary, ApiError> {
        let options = params.clone();
        let request = match input {
            SummaryInput::Text(text) => BridgeRequest::SummarizeText {
                text: text.clone(),
                options,
            },
            SummaryInput::File(path) => BridgeRequest::SummarizeFile {
                path: path.clone(),
                options,
            },
            SummaryInput::Url(url) => BridgeRequest::SummarizeUrl {
                url: url.clone(),
                options,
            },
        };
        self.call(request).await
    }

    async fn extract_keywords(
        &self,
        text: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<String>, ApiError> {
        let reply: KeywordsReply = self
            .call(BridgeRequest::ExtractKeywords {
                text: text.to_string(),
                count,
                language: language.to_string(),
            })
            .await?;
        Ok(reply.keywords)
    }

    async fn detect_language(&self, text: &str) -> Result<String, ApiError> {
        let reply: LanguageReply = self
            .call(BridgeRequest::DetectLanguage {
                text: text.to_string(),
            })
            .await?;
        Ok(reply.language)
    }

    async fn select_file(&self) -> Result<Option<PathBuf>, ApiError> {
        let selection: FileSelection = self.call(BridgeRequest::SelectFile).await?;
        Ok(if selection.canceled {
            None
        } else {
            selection.path
        })
    }

    async fn save_file(
        &self,
        content: &str,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, ApiError> {
        let outcome: SaveOutcome = self
            .call(BridgeRequest::SaveFile {
                content: content.to_string(),
                suggested_name: suggested_name.to_string(),
            })
            .await?;
        if outcome.canceled {
            return Ok(None);
        }
        match outcome.saved_path {
            Some(path) => Ok(Some(path)),
            None => Err(ApiError::new(FailureKind::Decode, "saveFile reply has no path")),
        }
    }

    async fn load_settings(&self) -> Result<StoredSettings, ApiError> {
        self.call(BridgeRequest::GetSettings).await
    }

    async fn save_settings(&self, settings: &StoredSettings) -> Result<(), ApiError> {
        let _: StoredSettings = self
            .call(BridgeRequest::SaveSettings(settings.clone()))
            .await?;
        Ok(())
    }

    async fn set_base_url(&self, api_url: Option<&str>) -> Result<(), ApiError> {
        let reply: Value = self
            .call(BridgeRequest::SetApiUrl {
                api_url: api_url.map(str::to_string),
            })
            .await?;
        engine_debug!("Gateway endpoint now {}", reply["apiUrl"]);
        Ok(())
    }
}

/// Calls the API client in-process; dialogs and disk writes still go to host collaborators.
pub struct DirectTransport {
    client: Arc<dyn ApiClient>,
    dialogs: Arc<dyn HostDialogs>,
    settings: SettingsStore,
    fallback_base_url: String,
}

impl DirectTransport {
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
}

#[async_trait::async_trait]
impl Transport for DirectTransport {
    async fn api_status(&self) -> Result<(), ApiError> {
        self.client.status().await.map(|_| ())
    }

    async fn scrape_url(&self, url: &str, use_ai_filter: bool) -> Result<ScrapedPage, ApiError> {
        self.client.scrape_url(url, use_ai_filter).await
    }

    async fn summarize(
        &self,
        input: &SummaryInput,
        params: &SummaryParams,
    ) -> Result<Summary, ApiError> {
        match input {
            SummaryInput::Text(text) => self.client.summarize_text(text, params).await,
            SummaryInput::File(path) => self.client.summarize_file(path, params).await,
            SummaryInput::Url(url) => self.client.summarize_url(url, params).await,
        }
    }

    async fn extract_keywords(
        &self,
        text: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.client.extract_keywords(text, count, language).await
    }

    async fn detect_language(&self, text: &str) -> Result<String, ApiError> {
        self.client.detect_language(text).await
    }

    async fn select_file(&self) -> Result<Option<PathBuf>, ApiError> {
        self.dialogs
            .pick_file_to_open()
            .await
            .map_err(|err| ApiError::new(FailureKind::Dialog, err.to_string()))
    }

    async fn save_file(
        &self,
        content: &str,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, ApiError> {
        let target = self
            .dialogs
            .pick_save_destination(suggested_name)
            .await
            .map_err(|err| ApiError::new(FailureKind::Dialog, err.to_string()))?;
        match target {
            Some(target) => export_to(self.client.as_ref(), content, &target)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    async fn load_settings(&self) -> Result<StoredSettings, ApiError> {
        Ok(self.settings.load())
    }

    async fn save_settings(&self, settings: &StoredSettings) -> Result<(), ApiError> {
        self.settings
            .save(settings)
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))
    }

    async fn set_base_url(&self, api_url: Option<&str>) -> Result<(), ApiError> {
        let endpoint = api_url
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.fallback_base_url);
        self.client.set_base_url(endpoint);
        Ok(())
    }
}
