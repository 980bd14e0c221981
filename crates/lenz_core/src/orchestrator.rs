//! Input-mode orchestration: which source is active and what is staged for it.
use std::path::{Path, PathBuf};

use crate::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    File,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = display_name(&path);
        Self { path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlFetchState {
    #[default]
    NotFetched,
    Fetching,
    Fetched,
    Editing,
}

/// Page returned by a successful scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub title: String,
    pub content: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchedPage {
    /// Address as typed when the fetch started.
    pub(crate) address: String,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct UrlStage {
    pub(crate) address: String,
    pub(crate) fetch: UrlFetchState,
    pub(crate) page: Option<FetchedPage>,
    pub(crate) edit_buffer: Option<String>,
    pending_fetch: Option<(RequestId, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct StagedContent {
    pub(crate) text: String,
    pub(crate) file: Option<SelectedFile>,
    pub(crate) url: UrlStage,
}

/// Client-side rejection, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyText,
    NoFileSelected,
    EmptyUrl,
    NothingFetched,
    KeywordsUnavailableForFile,
    DetectUnavailableForFile,
    NotFetched,
    NotEditing,
    EditInProgress,
    FetchInProgress,
    NoSummary,
    UnsupportedOutputLanguage(String),
    UnsupportedUiLanguage(String),
    InvalidEndpoint(String),
}

/// What the summarize call sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySource {
    Text(String),
    File(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Submission {
    pub(crate) source: SummarySource,
    /// Client-side text for the follow-up keyword extraction, when one exists.
    pub(crate) keyword_text: Option<String>,
}

pub(crate) enum FetchCompletion {
    Applied,
    Failed(String),
    Stale,
}

/// Owns the active [`InputMode`] and the staged content of every mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Orchestrator {
    mode: InputMode,
    staged: StagedContent,
}

impl Orchestrator {
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub(crate) fn staged(&self) -> &StagedContent {
        &self.staged
    }

    /// Switching never touches staged content of any mode.
    pub fn select_mode(&mut self, mode: InputMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn set_text(&mut self, text: String) -> bool {
        if self.staged.text == text {
            return false;
        }
        self.staged.text = text;
        true
    }

    /// Stores the handle only; the file is not read until submission.
    pub fn select_file(&mut self, path: PathBuf) {
        self.staged.file = Some(SelectedFile::from_path(path));
    }

    pub fn set_url_address(&mut self, address: String) -> bool {
        if self.staged.url.address == address {
            return false;
        }
        self.staged.url.address = address;
        true
    }

    pub fn url_fetch_state(&self) -> UrlFetchState {
        self.staged.url.fetch
    }

    /// `NotFetched`/`Fetched` -> `Fetching`. Returns the address to scrape.
    pub(crate) fn begin_fetch(&mut self, request_id: RequestId) -> Result<String, ValidationError> {
        let url = &mut self.staged.url;
        match url.fetch {
            UrlFetchState::Fetching => return Err(ValidationError::FetchInProgress),
            UrlFetchState::Editing => return Err(ValidationError::EditInProgress),
            UrlFetchState::NotFetched | UrlFetchState::Fetched => {}
        }
        let address = url.address.trim().to_string();
        if address.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        url.fetch = UrlFetchState::Fetching;
        url.page = None;
        url.edit_buffer = None;
        url.pending_fetch = Some((request_id, address.clone()));
        Ok(address)
    }

    pub(crate) fn complete_fetch(
        &mut self,
        request_id: RequestId,
        result: Result<ScrapedPage, String>,
    ) -> FetchCompletion {
        let url = &mut self.staged.url;
        let address = match url.pending_fetch.take() {
            Some((pending, address)) if pending == request_id => address,
            other => {
                url.pending_fetch = other;
                return FetchCompletion::Stale;
            }
        };
        match result {
            Ok(page) => {
                url.page = Some(FetchedPage {
                    address,
                    title: page.title,
                    body: page.content,
                    source_url: page.source_url,
                });
                url.fetch = UrlFetchState::Fetched;
                FetchCompletion::Applied
            }
            Err(message) => {
                url.page = None;
                url.fetch = UrlFetchState::NotFetched;
                FetchCompletion::Failed(message)
            }
        }
    }

    /// `Fetched` -> `Editing`, seeding the buffer from the committed body.
    pub fn begin_edit(&mut self) -> Result<(), ValidationError> {
        let url = &mut self.staged.url;
        if url.fetch != UrlFetchState::Fetched {
            return Err(ValidationError::NotFetched);
        }
        let Some(body) = url.page.as_ref().map(|page| page.body.clone()) else {
            return Err(ValidationError::NotFetched);
        };
        url.edit_buffer = Some(body);
        url.fetch = UrlFetchState::Editing;
        Ok(())
    }

    pub fn update_edit_buffer(&mut self, text: String) -> Result<(), ValidationError> {
        let url = &mut self.staged.url;
        if url.fetch != UrlFetchState::Editing {
            return Err(ValidationError::NotEditing);
        }
        url.edit_buffer = Some(text);
        Ok(())
    }

    /// `Editing` -> `Fetched`, replacing the committed body with the buffer.
    pub fn commit_edit(&mut self) -> Result<(), ValidationError> {
        let url = &mut self.staged.url;
        if url.fetch != UrlFetchState::Editing {
            return Err(ValidationError::NotEditing);
        }
        if let (Some(buffer), Some(page)) = (url.edit_buffer.take(), url.page.as_mut()) {
            page.body = buffer;
        }
        url.fetch = UrlFetchState::Fetched;
        Ok(())
    }

    /// `Editing` -> `Fetched`, dropping the buffer.
    pub fn cancel_edit(&mut self) -> Result<(), ValidationError> {
        let url = &mut self.staged.url;
        if url.fetch != UrlFetchState::Editing {
            return Err(ValidationError::NotEditing);
        }
        url.edit_buffer = None;
        url.fetch = UrlFetchState::Fetched;
        Ok(())
    }

    /// Committed body of a completed fetch, ignoring any open edit buffer.
    fn committed_body(&self) -> Option<&str> {
        match self.staged.url.fetch {
            UrlFetchState::Fetched | UrlFetchState::Editing => {
                self.staged.url.page.as_ref().map(|page| page.body.as_str())
            }
            UrlFetchState::NotFetched | UrlFetchState::Fetching => None,
        }
    }

    fn staged_text(&self) -> Result<String, ValidationError> {
        let text = self.staged.text.trim();
        if text.is_empty() {
            Err(ValidationError::EmptyText)
        } else {
            Ok(text.to_string())
        }
    }

    /// Reads strictly from the active mode.
    pub(crate) fn submission(&self) -> Result<Submission, ValidationError> {
        match self.mode {
            InputMode::Text => {
                let text = self.staged_text()?;
                Ok(Submission {
                    source: SummarySource::Text(text.clone()),
                    keyword_text: Some(text),
                })
            }
            InputMode::File => {
                let file = self
                    .staged
                    .file
                    .as_ref()
                    .ok_or(ValidationError::NoFileSelected)?;
                Ok(Submission {
                    source: SummarySource::File(file.path.clone()),
                    keyword_text: None,
                })
            }
            InputMode::Url => {
                let address = self.staged.url.address.trim();
                if address.is_empty() {
                    return Err(ValidationError::EmptyUrl);
                }
                let fetched_body = self
                    .committed_body()
                    .filter(|_| self.fetched_address() == Some(address))
                    .map(str::trim)
                    .filter(|body| !body.is_empty());
                match fetched_body {
                    Some(body) => Ok(Submission {
                        source: SummarySource::Text(body.to_string()),
                        keyword_text: Some(body.to_string()),
                    }),
                    None => Ok(Submission {
                        source: SummarySource::Url(address.to_string()),
                        keyword_text: None,
                    }),
                }
            }
        }
    }

    fn fetched_address(&self) -> Option<&str> {
        self.staged.url.page.as_ref().map(|page| page.address.as_str())
    }

    /// Text used by manual keyword extraction and language detection.
    pub(crate) fn analysis_text(&self, for_keywords: bool) -> Result<String, ValidationError> {
        match self.mode {
            InputMode::Text => self.staged_text(),
            InputMode::File if for_keywords => Err(ValidationError::KeywordsUnavailableForFile),
            InputMode::File => Err(ValidationError::DetectUnavailableForFile),
            InputMode::Url => self
                .committed_body()
                .map(str::trim)
                .filter(|body| !body.is_empty())
                .map(ToOwned::to_owned)
                .ok_or(ValidationError::NothingFetched),
        }
    }
}
