use std::sync::{mpsc, Arc};

use engine_logging::{engine_info, engine_warn};
use lenz_core::{Effect, Msg, Settings, SummaryOptions, SummaryOutcome, SummarySource, UiLanguage};
use lenz_engine::{ApiError, StoredSettings, SummaryInput, SummaryParams, Transport};
use tokio::runtime::Handle;

use super::app::ShellEvent;

/// Runs core effects on the async runtime and reports back as `Msg`s.
pub struct EffectRunner {
    runtime: Handle,
    transport: Arc<dyn Transport>,
    events: mpsc::Sender<ShellEvent>,
}

impl EffectRunner {
    pub(crate) fn new(
        runtime: Handle,
        transport: Arc<dyn Transport>,
        events: mpsc::Sender<ShellEvent>,
    ) -> Self {
        Self {
            runtime,
            transport,
            events,
        }
    }

    /// Effects of one batch run in order on a single task.
    pub fn enqueue(&self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let transport = self.transport.clone();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            for effect in effects {
                if let Some(msg) = run_effect(transport.as_ref(), effect).await {
                    let _ = events.send(ShellEvent::Msg(msg));
                }
            }
        });
    }

    /// Reads persisted settings through the transport, blocking until they arrive.
    /// Called before the shell loop starts so no user choice can be overwritten.
    pub fn load_settings(&self) -> Settings {
        match self.runtime.block_on(self.transport.load_settings()) {
            Ok(stored) => map_settings(stored),
            Err(err) => {
                engine_warn!("Could not load settings: {}", err);
                Settings::default()
            }
        }
    }
}

async fn run_effect(transport: &dyn Transport, effect: Effect) -> Option<Msg> {
    match effect {
        Effect::CheckApiStatus => {
            engine_info!("CheckApiStatus");
            let result = transport.api_status().await.map_err(describe);
            Some(Msg::ApiStatusChecked(result))
        }
        Effect::SelectFile => {
            engine_info!("SelectFile");
            let result = transport.select_file().await.map_err(describe);
            Some(Msg::FileSelected(result))
        }
        Effect::ScrapeUrl {
            request_id,
            url,
            use_ai_filter,
        } => {
            engine_logging::note_request_id(request_id);
            engine_info!(
                "ScrapeUrl request_id={} url={} ai_filter={}",
                request_id,
                url,
                use_ai_filter
            );
            let result = transport
                .scrape_url(&url, use_ai_filter)
                .await
                .map(|page| lenz_core::ScrapedPage {
                    title: page.title,
                    content: page.content,
                    source_url: page.source_url,
                })
                .map_err(describe);
            Some(Msg::UrlFetched { request_id, result })
        }
        Effect::Summarize {
            request_id,
            source,
            options,
        } => {
            engine_logging::note_request_id(request_id);
            let input = map_source(source);
            engine_info!(
                "Summarize request_id={} source={} length={} format={} language={}",
                request_id,
                source_label(&input),
                options.length.as_str(),
                options.format.as_str(),
                options.language.as_str()
            );
            let result = transport
                .summarize(&input, &map_options(&options))
                .await
                .map(|summary| SummaryOutcome {
                    summary: summary.summary,
                    detected_language: summary.detected_language,
                    detected_language_name: summary.detected_language_name,
                })
                .map_err(describe);
            Some(Msg::SummaryCompleted { request_id, result })
        }
        Effect::ExtractKeywords {
            request_id,
            text,
            count,
            language,
        } => {
            engine_logging::note_request_id(request_id);
            engine_info!(
                "ExtractKeywords request_id={} text_len={} count={}",
                request_id,
                text.len(),
                count
            );
            let result = transport
                .extract_keywords(&text, count, language.as_str())
                .await
                .map_err(describe);
            Some(Msg::KeywordsCompleted { request_id, result })
        }
        Effect::DetectLanguage { request_id, text } => {
            engine_logging::note_request_id(request_id);
            engine_info!("DetectLanguage request_id={} text_len={}", request_id, text.len());
            let result = transport.detect_language(&text).await.map_err(describe);
            Some(Msg::LanguageDetected { request_id, result })
        }
        Effect::SaveSummary {
            request_id,
            summary,
            suggested_name,
        } => {
            engine_logging::note_request_id(request_id);
            engine_info!("SaveSummary request_id={} suggested={}", request_id, suggested_name);
            let result = transport
                .save_file(&summary, &suggested_name)
                .await
                .map_err(describe);
            Some(Msg::SaveCompleted { request_id, result })
        }
        Effect::ReconfigureEndpoint { api_url } => {
            engine_info!("ReconfigureEndpoint api_url={:?}", api_url);
            let result = transport
                .set_base_url(api_url.as_deref())
                .await
                .map_err(describe);
            Some(Msg::EndpointReconfigured(result))
        }
        Effect::PersistSettings(settings) => {
            engine_info!("PersistSettings language={}", settings.ui_language.code());
            let result = transport
                .save_settings(&map_stored(&settings))
                .await
                .map_err(describe);
            Some(Msg::SettingsPersisted(result))
        }
    }
}

fn describe(err: ApiError) -> String {
    err.message
}

fn map_source(source: SummarySource) -> SummaryInput {
    match source {
        SummarySource::Text(text) => SummaryInput::Text(text),
        SummarySource::File(path) => SummaryInput::File(path),
        SummarySource::Url(url) => SummaryInput::Url(url),
    }
}

fn source_label(input: &SummaryInput) -> String {
    match input {
        SummaryInput::Text(text) => format!("text({} bytes)", text.len()),
        SummaryInput::File(path) => format!("file({})", path.display()),
        SummaryInput::Url(url) => format!("url({url})"),
    }
}

fn map_options(options: &SummaryOptions) -> SummaryParams {
    SummaryParams {
        length: options.length.as_str().to_string(),
        format: options.format.as_str().to_string(),
        language: options.language.as_str().to_string(),
    }
}

fn map_settings(stored: StoredSettings) -> Settings {
    Settings {
        ui_language: UiLanguage::from_code(&stored.language).unwrap_or_default(),
        api_url: stored.api_url,
    }
}

fn map_stored(settings: &Settings) -> StoredSettings {
    StoredSettings {
        language: settings.ui_language.code().to_string(),
        api_url: settings.api_url.clone(),
    }
}
