use std::path::PathBuf;

use crate::{OperationKind, ValidationError};

/// Non-blocking user-facing message. The view layer owns the wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(ValidationError),
    FetchFailed { message: String },
    OperationFailed { kind: OperationKind, message: String },
    FileSelectionFailed { message: String },
    ExportSaved { path: PathBuf },
    SettingsSaved,
    /// Writing settings or re-pointing the client failed.
    SettingsFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Unknown,
    Checking,
    Connected,
    Unreachable,
}
