//! Contents Lenz core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod notice;
mod options;
mod orchestrator;
mod presentation;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use notice::{ApiStatus, Notice};
pub use options::{OutputLanguage, SummaryFormat, SummaryLength, SummaryOptions, KEYWORD_COUNT};
pub use orchestrator::{
    InputMode, Orchestrator, ScrapedPage, SelectedFile, SummarySource, UrlFetchState,
    ValidationError,
};
pub use presentation::{Lifecycle, OperationKind, Presentation, ResultRecord, SummaryOutcome};
pub use settings::{Settings, UiLanguage};
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::{AppViewModel, ControlsView, UrlView, MAX_PREVIEW_CHARS};
