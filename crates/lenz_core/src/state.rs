use crate::orchestrator::UrlFetchState;
use crate::view_model::{prepare_preview, AppViewModel, ControlsView, UrlView};
use crate::{
    ApiStatus, InputMode, Notice, OperationKind, Orchestrator, Presentation, Settings,
    SummaryOptions,
};

pub type RequestId = u64;

/// Whole UI session state. Owned by the shell and threaded through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) orchestrator: Orchestrator,
    pub(crate) presentation: Presentation,
    pub(crate) options: SummaryOptions,
    pub(crate) use_ai_filter: bool,
    pub(crate) settings: Settings,
    /// Endpoint given on the command line, if any.
    pub(crate) endpoint_override: Option<String>,
    /// Endpoint requests currently go to; `None` is the built-in default.
    pub(crate) endpoint: Option<String>,
    pub(crate) api_status: ApiStatus,
    pub(crate) notice: Option<Notice>,
    /// Client-side text for the keyword pass that follows the summary in flight.
    pub(crate) keyword_source: Option<String>,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            orchestrator: Orchestrator::default(),
            presentation: Presentation::default(),
            options: SummaryOptions::default(),
            use_ai_filter: true,
            settings: Settings::default(),
            endpoint_override: None,
            endpoint: None,
            api_status: ApiStatus::default(),
            notice: None,
            keyword_source: None,
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose client was started against `endpoint` instead of the saved one.
    pub fn with_endpoint_override(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty());
        Self {
            endpoint: endpoint.clone(),
            endpoint_override: endpoint,
            ..Self::default()
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    /// Returns whether a re-render is due, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let staged = self.orchestrator.staged();
        let page = staged.url.page.as_ref();
        let fetch = staged.url.fetch;
        let presentation = &self.presentation;
        let mode = self.orchestrator.mode();
        let has_summary = presentation.record().summary_text.is_some();

        AppViewModel {
            mode,
            text: staged.text.clone(),
            selected_file: staged.file.as_ref().map(|file| file.name.clone()),
            url: UrlView {
                address: staged.url.address.clone(),
                fetch,
                use_ai_filter: self.use_ai_filter,
                title: page.map(|page| page.title.clone()),
                source_url: page.map(|page| page.source_url.clone()),
                preview: page.map(|page| prepare_preview(&page.body)),
                edit_buffer: staged.url.edit_buffer.clone(),
            },
            options: self.options.clone(),
            summarize: presentation.lifecycle(OperationKind::Summarize),
            keywords: presentation.lifecycle(OperationKind::Keywords),
            detect: presentation.lifecycle(OperationKind::DetectLanguage),
            export: presentation.lifecycle(OperationKind::Export),
            controls: ControlsView {
                summarize: !presentation.is_loading(OperationKind::Summarize),
                keywords: !presentation.is_loading(OperationKind::Keywords)
                    && mode != InputMode::File,
                detect: !presentation.is_loading(OperationKind::DetectLanguage)
                    && mode != InputMode::File,
                export: !presentation.is_loading(OperationKind::Export) && has_summary,
                fetch: matches!(fetch, UrlFetchState::NotFetched | UrlFetchState::Fetched),
                edit: fetch == UrlFetchState::Fetched,
            },
            result: presentation.record().clone(),
            api_status: self.api_status,
            ui_language: self.settings.ui_language,
            endpoint: self.endpoint.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }
}
