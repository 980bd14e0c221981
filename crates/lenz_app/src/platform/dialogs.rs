use std::path::PathBuf;
use std::sync::mpsc;

use lenz_engine::{DialogError, HostDialogs};
use tokio::sync::oneshot;

use super::app::ShellEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptKind {
    OpenFile,
    SaveFile { suggested_name: String },
}

/// A question for the user; the shell answers it with the next input line.
#[derive(Debug)]
pub(crate) struct DialogPrompt {
    pub(crate) kind: PromptKind,
    pub(crate) reply: oneshot::Sender<Option<PathBuf>>,
}

/// Host dialogs backed by the terminal: the path is typed on stdin, an empty line cancels.
pub(crate) struct TerminalDialogs {
    events: mpsc::Sender<ShellEvent>,
}

impl TerminalDialogs {
    pub(crate) fn new(events: mpsc::Sender<ShellEvent>) -> Self {
        Self { events }
    }

    async fn ask(&self, kind: PromptKind) -> Result<Option<PathBuf>, DialogError> {
        let (reply, answer) = oneshot::channel();
        self.events
            .send(ShellEvent::Prompt(DialogPrompt { kind, reply }))
            .map_err(|_| DialogError("shell is gone".to_string()))?;
        // A dropped sender means the shell exited before answering.
        Ok(answer.await.unwrap_or(None))
    }
}

#[async_trait::async_trait]
impl HostDialogs for TerminalDialogs {
    async fn pick_file_to_open(&self) -> Result<Option<PathBuf>, DialogError> {
        let Some(path) = self.ask(PromptKind::OpenFile).await? else {
            return Ok(None);
        };
        if !path.is_file() {
            return Err(DialogError(format!("{} is not a readable file", path.display())));
        }
        Ok(Some(path))
    }

    async fn pick_save_destination(
        &self,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, DialogError> {
        self.ask(PromptKind::SaveFile {
            suggested_name: suggested_name.to_string(),
        })
        .await
    }
}

/// Turns an answer line into a path; blank means canceled.
pub(crate) fn answer_to_path(line: &str) -> Option<PathBuf> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
