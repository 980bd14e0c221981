use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("dialog failed: {0}")]
pub struct DialogError(pub String);

/// Host-side file pickers. `Ok(None)` means the user dismissed the dialog.
#[async_trait::async_trait]
pub trait HostDialogs: Send + Sync {
    async fn pick_file_to_open(&self) -> Result<Option<PathBuf>, DialogError>;
    async fn pick_save_destination(
        &self,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, DialogError>;
}
