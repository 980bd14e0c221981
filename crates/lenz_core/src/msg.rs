use std::path::PathBuf;

use crate::{
    InputMode, RequestId, ScrapedPage, Settings, SummaryFormat, SummaryLength, SummaryOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Persisted settings were read at startup.
    SettingsLoaded(Settings),
    /// Ask the API whether it is reachable.
    ApiStatusRequested,
    ApiStatusChecked(Result<(), String>),
    /// User clicked one of the input mode buttons.
    ModeSelected(InputMode),
    /// User edited the text input.
    TextChanged(String),
    /// User asked for the host file dialog.
    SelectFileClicked,
    /// Host file dialog closed; `Ok(None)` means canceled.
    FileSelected(Result<Option<PathBuf>, String>),
    /// User edited the URL input.
    UrlChanged(String),
    AiFilterToggled(bool),
    FetchClicked,
    UrlFetched {
        request_id: RequestId,
        result: Result<ScrapedPage, String>,
    },
    EditClicked,
    EditBufferChanged(String),
    SaveEditClicked,
    CancelEditClicked,
    LengthChanged(SummaryLength),
    FormatChanged(SummaryFormat),
    OutputLanguageChanged(String),
    SummarizeClicked,
    SummaryCompleted {
        request_id: RequestId,
        result: Result<SummaryOutcome, String>,
    },
    ExtractKeywordsClicked,
    KeywordsCompleted {
        request_id: RequestId,
        result: Result<Vec<String>, String>,
    },
    DetectLanguageClicked,
    LanguageDetected {
        request_id: RequestId,
        result: Result<String, String>,
    },
    SaveResultClicked,
    /// Export finished; `Ok(None)` means the save dialog was canceled.
    SaveCompleted {
        request_id: RequestId,
        result: Result<Option<PathBuf>, String>,
    },
    UiLanguageChanged(String),
    /// `None` or a blank value restores the built-in endpoint.
    ApiEndpointSaved(Option<String>),
    SettingsPersisted(Result<(), String>),
    EndpointReconfigured(Result<(), String>),
    NoticeDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
