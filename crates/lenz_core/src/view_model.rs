use crate::{
    ApiStatus, InputMode, Lifecycle, Notice, ResultRecord, SummaryOptions, UiLanguage,
    UrlFetchState,
};

/// Scraped body shown in the URL preview is cut to this many characters.
pub const MAX_PREVIEW_CHARS: usize = 500;
const TRUNCATED_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlView {
    pub address: String,
    pub fetch: UrlFetchState,
    pub use_ai_filter: bool,
    pub title: Option<String>,
    pub source_url: Option<String>,
    /// Committed body, truncated for display.
    pub preview: Option<String>,
    /// Present only while editing.
    pub edit_buffer: Option<String>,
}

/// Which controls accept input right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsView {
    pub summarize: bool,
    pub keywords: bool,
    pub detect: bool,
    pub export: bool,
    pub fetch: bool,
    pub edit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: InputMode,
    pub text: String,
    pub selected_file: Option<String>,
    pub url: UrlView,
    pub options: SummaryOptions,
    pub summarize: Lifecycle,
    pub keywords: Lifecycle,
    pub detect: Lifecycle,
    pub export: Lifecycle,
    pub controls: ControlsView,
    pub result: ResultRecord,
    pub api_status: ApiStatus,
    pub ui_language: UiLanguage,
    /// Where requests go; `None` means the built-in default.
    pub endpoint: Option<String>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

pub(crate) fn prepare_preview(body: &str) -> String {
    match body.char_indices().nth(MAX_PREVIEW_CHARS) {
        None => body.to_string(),
        Some((end, _)) => format!("{}{TRUNCATED_MARKER}", &body[..end]),
    }
}
