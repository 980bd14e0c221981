use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::orchestrator::FetchCompletion;
use crate::presentation::Completion;
use crate::settings::normalize_endpoint;
use crate::{
    ApiStatus, AppState, Effect, Msg, Notice, OperationKind, OutputLanguage, UiLanguage,
    ValidationError, KEYWORD_COUNT,
};

const EXPORT_FILENAME: &str = "summary.txt";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if is_user_action(&msg) && state.notice.take().is_some() {
        state.mark_dirty();
    }

    let effects = match msg {
        Msg::SettingsLoaded(settings) => {
            state.endpoint = state
                .endpoint_override
                .clone()
                .or_else(|| settings.api_url.clone());
            state.settings = settings;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ApiStatusRequested => {
            state.api_status = ApiStatus::Checking;
            state.mark_dirty();
            vec![Effect::CheckApiStatus]
        }
        Msg::ApiStatusChecked(result) => {
            state.api_status = match result {
                Ok(()) => ApiStatus::Connected,
                Err(message) => {
                    engine_warn!("API status check failed: {}", message);
                    ApiStatus::Unreachable
                }
            };
            state.mark_dirty();
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            if state.orchestrator.select_mode(mode) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TextChanged(text) => {
            if state.orchestrator.set_text(text) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SelectFileClicked => vec![Effect::SelectFile],
        Msg::FileSelected(result) => {
            match result {
                Ok(Some(path)) => {
                    state.orchestrator.select_file(path);
                    state.mark_dirty();
                }
                Ok(None) => engine_debug!("File selection canceled"),
                Err(message) => state.set_notice(Notice::FileSelectionFailed { message }),
            }
            Vec::new()
        }
        Msg::UrlChanged(address) => {
            if state.orchestrator.set_url_address(address) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AiFilterToggled(enabled) => {
            if state.use_ai_filter != enabled {
                state.use_ai_filter = enabled;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FetchClicked => {
            let request_id = state.allocate_request_id();
            match state.orchestrator.begin_fetch(request_id) {
                Ok(url) => {
                    state.mark_dirty();
                    vec![Effect::ScrapeUrl {
                        request_id,
                        url,
                        use_ai_filter: state.use_ai_filter,
                    }]
                }
                Err(ValidationError::FetchInProgress) => Vec::new(),
                Err(err) => reject(&mut state, err),
            }
        }
        Msg::UrlFetched { request_id, result } => {
            match state.orchestrator.complete_fetch(request_id, result) {
                FetchCompletion::Applied => state.mark_dirty(),
                FetchCompletion::Failed(message) => {
                    state.set_notice(Notice::FetchFailed { message });
                }
                FetchCompletion::Stale => {
                    engine_debug!("Discarding stale scrape response {}", request_id);
                }
            }
            Vec::new()
        }
        Msg::EditClicked => edit_step(&mut state, |o| o.begin_edit()),
        Msg::EditBufferChanged(text) => {
            edit_step(&mut state, move |o| o.update_edit_buffer(text))
        }
        Msg::SaveEditClicked => edit_step(&mut state, |o| o.commit_edit()),
        Msg::CancelEditClicked => edit_step(&mut state, |o| o.cancel_edit()),
        Msg::LengthChanged(length) => {
            state.options.length = length;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FormatChanged(format) => {
            state.options.format = format;
            state.mark_dirty();
            Vec::new()
        }
        Msg::OutputLanguageChanged(raw) => match OutputLanguage::parse(&raw) {
            Some(language) => {
                state.options.language = language;
                state.mark_dirty();
                Vec::new()
            }
            None => reject(&mut state, ValidationError::UnsupportedOutputLanguage(raw)),
        },
        Msg::SummarizeClicked => {
            if state.presentation.is_loading(OperationKind::Summarize) {
                return (state, Vec::new());
            }
            match state.orchestrator.submission() {
                Ok(submission) => {
                    let request_id = state.allocate_request_id();
                    state
                        .presentation
                        .begin_operation(OperationKind::Summarize, request_id);
                    state.keyword_source = submission.keyword_text;
                    state.mark_dirty();
                    vec![Effect::Summarize {
                        request_id,
                        source: submission.source,
                        options: state.options.clone(),
                    }]
                }
                Err(err) => reject(&mut state, err),
            }
        }
        Msg::SummaryCompleted { request_id, result } => {
            match state.presentation.complete_summary(request_id, result) {
                Completion::Succeeded => {
                    state.mark_dirty();
                    follow_up_keywords(&mut state)
                }
                Completion::Failed(message) | Completion::SecondaryFailed(message) => {
                    state.keyword_source = None;
                    state.set_notice(Notice::OperationFailed {
                        kind: OperationKind::Summarize,
                        message,
                    });
                    Vec::new()
                }
                Completion::Stale => Vec::new(),
            }
        }
        Msg::ExtractKeywordsClicked => {
            if state.presentation.is_loading(OperationKind::Keywords) {
                return (state, Vec::new());
            }
            match state.orchestrator.analysis_text(true) {
                Ok(text) => {
                    let request_id = state.allocate_request_id();
                    state
                        .presentation
                        .begin_operation(OperationKind::Keywords, request_id);
                    state.mark_dirty();
                    vec![Effect::ExtractKeywords {
                        request_id,
                        text,
                        count: KEYWORD_COUNT,
                        language: state.options.language.clone(),
                    }]
                }
                Err(err) => reject(&mut state, err),
            }
        }
        Msg::KeywordsCompleted { request_id, result } => {
            match state.presentation.complete_keywords(request_id, result) {
                Completion::Succeeded => state.mark_dirty(),
                Completion::Failed(message) => state.set_notice(Notice::OperationFailed {
                    kind: OperationKind::Keywords,
                    message,
                }),
                Completion::SecondaryFailed(message) => {
                    engine_warn!("Automatic keyword extraction failed: {}", message);
                    state.mark_dirty();
                }
                Completion::Stale => {}
            }
            Vec::new()
        }
        Msg::DetectLanguageClicked => {
            if state.presentation.is_loading(OperationKind::DetectLanguage) {
                return (state, Vec::new());
            }
            match state.orchestrator.analysis_text(false) {
                Ok(text) => {
                    let request_id = state.allocate_request_id();
                    state
                        .presentation
                        .begin_operation(OperationKind::DetectLanguage, request_id);
                    state.mark_dirty();
                    vec![Effect::DetectLanguage { request_id, text }]
                }
                Err(err) => reject(&mut state, err),
            }
        }
        Msg::LanguageDetected { request_id, result } => {
            match state.presentation.complete_detection(request_id, result) {
                Completion::Succeeded => state.mark_dirty(),
                Completion::Failed(message) | Completion::SecondaryFailed(message) => {
                    state.set_notice(Notice::OperationFailed {
                        kind: OperationKind::DetectLanguage,
                        message,
                    });
                }
                Completion::Stale => {}
            }
            Vec::new()
        }
        Msg::SaveResultClicked => {
            if state.presentation.is_loading(OperationKind::Export) {
                return (state, Vec::new());
            }
            match state.presentation.record().summary_text.clone() {
                Some(summary) => {
                    let request_id = state.allocate_request_id();
                    state
                        .presentation
                        .begin_operation(OperationKind::Export, request_id);
                    state.mark_dirty();
                    vec![Effect::SaveSummary {
                        request_id,
                        summary,
                        suggested_name: EXPORT_FILENAME.to_string(),
                    }]
                }
                None => reject(&mut state, ValidationError::NoSummary),
            }
        }
        Msg::SaveCompleted { request_id, result } => {
            let saved_path = result.as_ref().ok().cloned().flatten();
            let result = result.map(|path| path.is_some());
            match state.presentation.complete_export(request_id, result) {
                Completion::Succeeded => match saved_path {
                    Some(path) => state.set_notice(Notice::ExportSaved { path }),
                    None => state.mark_dirty(),
                },
                Completion::Failed(message) | Completion::SecondaryFailed(message) => {
                    state.set_notice(Notice::OperationFailed {
                        kind: OperationKind::Export,
                        message,
                    });
                }
                Completion::Stale => {}
            }
            Vec::new()
        }
        Msg::UiLanguageChanged(code) => match UiLanguage::from_code(&code) {
            Some(language) if language == state.settings.ui_language => Vec::new(),
            Some(language) => {
                state.settings.ui_language = language;
                state.mark_dirty();
                vec![Effect::PersistSettings(state.settings.clone())]
            }
            None => reject(&mut state, ValidationError::UnsupportedUiLanguage(code)),
        },
        Msg::ApiEndpointSaved(raw) => match normalize_endpoint(raw.as_deref()) {
            Ok(api_url) => {
                engine_info!("API endpoint set to {:?}", api_url);
                state.settings.api_url = api_url.clone();
                state.endpoint = api_url.clone().or_else(|| state.endpoint_override.clone());
                state.api_status = ApiStatus::Checking;
                state.mark_dirty();
                vec![
                    Effect::ReconfigureEndpoint { api_url },
                    Effect::PersistSettings(state.settings.clone()),
                    Effect::CheckApiStatus,
                ]
            }
            Err(()) => reject(
                &mut state,
                ValidationError::InvalidEndpoint(raw.unwrap_or_default()),
            ),
        },
        Msg::SettingsPersisted(Ok(())) => {
            // A failure earlier in the same save stays visible.
            if !matches!(state.notice, Some(Notice::SettingsFailed { .. })) {
                state.set_notice(Notice::SettingsSaved);
            }
            Vec::new()
        }
        Msg::SettingsPersisted(Err(message)) | Msg::EndpointReconfigured(Err(message)) => {
            engine_warn!("Settings were not applied: {}", message);
            state.set_notice(Notice::SettingsFailed { message });
            Vec::new()
        }
        Msg::EndpointReconfigured(Ok(())) => Vec::new(),
        Msg::NoticeDismissed => Vec::new(),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_user_action(msg: &Msg) -> bool {
    !matches!(
        msg,
        Msg::SettingsLoaded(_)
            | Msg::ApiStatusChecked(_)
            | Msg::FileSelected(_)
            | Msg::UrlFetched { .. }
            | Msg::SummaryCompleted { .. }
            | Msg::KeywordsCompleted { .. }
            | Msg::LanguageDetected { .. }
            | Msg::SaveCompleted { .. }
            | Msg::SettingsPersisted(_)
            | Msg::EndpointReconfigured(_)
            | Msg::Tick
            | Msg::NoOp
    )
}

/// Records a validation notice; never emits effects.
fn reject(state: &mut AppState, err: ValidationError) -> Vec<Effect> {
    engine_debug!("Rejected before submission: {:?}", err);
    state.set_notice(Notice::Validation(err));
    Vec::new()
}

fn edit_step<F>(state: &mut AppState, step: F) -> Vec<Effect>
where
    F: FnOnce(&mut crate::Orchestrator) -> Result<(), ValidationError>,
{
    match step(&mut state.orchestrator) {
        Ok(()) => {
            state.mark_dirty();
            Vec::new()
        }
        Err(err) => reject(state, err),
    }
}

/// One best-effort keyword pass per successful summary, in every mode.
fn follow_up_keywords(state: &mut AppState) -> Vec<Effect> {
    let text = state
        .keyword_source
        .take()
        .or_else(|| state.presentation.record().summary_text.clone())
        .filter(|text| !text.trim().is_empty());
    let Some(text) = text else {
        return Vec::new();
    };
    let request_id = state.allocate_request_id();
    state.presentation.begin_secondary_keywords(request_id);
    vec![Effect::ExtractKeywords {
        request_id,
        text,
        count: KEYWORD_COUNT,
        language: state.options.language.clone(),
    }]
}
