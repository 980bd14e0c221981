//! Contents Lenz engine: API client, host bridge gateway and transports.
mod bridge;
mod client;
mod dialogs;
mod persist;
mod settings;
mod transport;
mod types;

pub use bridge::{error_reply, BridgeError, BridgeGateway, BridgeRequest, DEFAULT_EXPORT_FORMAT};
pub use client::{normalize_url, ApiClient, ClientSettings, ReqwestApiClient};
pub use dialogs::{DialogError, HostDialogs};
pub use persist::{ensure_target_dir, write_atomically, AtomicFileWriter, PersistError};
pub use settings::{SettingsStore, StoredSettings, DEFAULT_UI_LANGUAGE, SUPPORTED_UI_LANGUAGES};
pub use transport::{BridgeTransport, DirectTransport, Transport};
pub use types::{
    ApiError, FailureKind, FileSelection, SaveOutcome, ScrapedPage, Summary, SummaryInput,
    SummaryParams, DEFAULT_API_URL,
};
