//! Request lifecycles and the result panels they feed.
use engine_logging::engine_debug;

use crate::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationKind {
    Summarize,
    Keywords,
    DetectLanguage,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub summary: String,
    pub detected_language: Option<String>,
    pub detected_language_name: Option<String>,
}

/// Everything the result panels show. Cleared, not hidden, when a new
/// submission begins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRecord {
    pub summary_text: Option<String>,
    pub detected_language_code: Option<String>,
    pub detected_language_name: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    id: RequestId,
    secondary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Slot {
    lifecycle: Lifecycle,
    pending: Option<Pending>,
}

/// How a completion message was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Completion {
    Succeeded,
    Failed(String),
    /// Best-effort operation failed; log it, never surface it.
    SecondaryFailed(String),
    /// A newer operation of the same kind has begun since this one started.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Presentation {
    summarize: Slot,
    keywords: Slot,
    detect: Slot,
    export: Slot,
    record: ResultRecord,
}

impl Presentation {
    fn slot(&self, kind: OperationKind) -> &Slot {
        match kind {
            OperationKind::Summarize => &self.summarize,
            OperationKind::Keywords => &self.keywords,
            OperationKind::DetectLanguage => &self.detect,
            OperationKind::Export => &self.export,
        }
    }

    fn slot_mut(&mut self, kind: OperationKind) -> &mut Slot {
        match kind {
            OperationKind::Summarize => &mut self.summarize,
            OperationKind::Keywords => &mut self.keywords,
            OperationKind::DetectLanguage => &mut self.detect,
            OperationKind::Export => &mut self.export,
        }
    }

    pub fn lifecycle(&self, kind: OperationKind) -> Lifecycle {
        self.slot(kind).lifecycle
    }

    pub fn is_loading(&self, kind: OperationKind) -> bool {
        self.lifecycle(kind) == Lifecycle::Loading
    }

    pub fn record(&self) -> &ResultRecord {
        &self.record
    }

    /// Enters `Loading` for `kind` and clears the result fields it owns.
    /// Returns `false`, changing nothing, if `kind` is already loading.
    pub fn begin_operation(&mut self, kind: OperationKind, id: RequestId) -> bool {
        if self.is_loading(kind) {
            return false;
        }
        match kind {
            OperationKind::Summarize => {
                self.record = ResultRecord::default();
                // Keywords belong to the summary they were extracted for.
                self.keywords = Slot::default();
                self.detect.pending = None;
                if self.detect.lifecycle == Lifecycle::Loading {
                    self.detect.lifecycle = Lifecycle::Idle;
                }
            }
            OperationKind::Keywords => self.record.keywords.clear(),
            OperationKind::DetectLanguage => {
                self.record.detected_language_code = None;
                self.record.detected_language_name = None;
            }
            OperationKind::Export => {}
        }
        *self.slot_mut(kind) = Slot {
            lifecycle: Lifecycle::Loading,
            pending: Some(Pending {
                id,
                secondary: false,
            }),
        };
        true
    }

    /// Starts the automatic keyword extraction that follows a summary.
    /// Supersedes any keyword request still in flight without touching the
    /// keyword lifecycle, so the manual control stays usable.
    pub fn begin_secondary_keywords(&mut self, id: RequestId) {
        self.record.keywords.clear();
        if self.keywords.lifecycle == Lifecycle::Loading {
            self.keywords.lifecycle = Lifecycle::Idle;
        }
        self.keywords.pending = Some(Pending {
            id,
            secondary: true,
        });
    }

    /// Takes the pending request for `kind` if `id` is the one in flight.
    fn settle(&mut self, kind: OperationKind, id: RequestId) -> Option<Pending> {
        let slot = self.slot_mut(kind);
        match slot.pending {
            Some(pending) if pending.id == id => {
                slot.pending = None;
                Some(pending)
            }
            _ => {
                engine_debug!("Discarding stale {:?} response for request {}", kind, id);
                None
            }
        }
    }

    fn finish(&mut self, kind: OperationKind, pending: Pending, ok: bool) {
        if pending.secondary {
            return;
        }
        self.slot_mut(kind).lifecycle = if ok {
            Lifecycle::Succeeded
        } else {
            Lifecycle::Failed
        };
    }

    pub(crate) fn complete_summary(
        &mut self,
        id: RequestId,
        result: Result<SummaryOutcome, String>,
    ) -> Completion {
        let Some(pending) = self.settle(OperationKind::Summarize, id) else {
            return Completion::Stale;
        };
        match result {
            Ok(outcome) => {
                self.record.summary_text = Some(outcome.summary);
                self.record.detected_language_code = outcome.detected_language;
                self.record.detected_language_name = outcome.detected_language_name;
                self.finish(OperationKind::Summarize, pending, true);
                Completion::Succeeded
            }
            Err(message) => {
                self.record = ResultRecord::default();
                self.finish(OperationKind::Summarize, pending, false);
                Completion::Failed(message)
            }
        }
    }

    pub(crate) fn complete_keywords(
        &mut self,
        id: RequestId,
        result: Result<Vec<String>, String>,
    ) -> Completion {
        let Some(pending) = self.settle(OperationKind::Keywords, id) else {
            return Completion::Stale;
        };
        match result {
            Ok(keywords) => {
                self.record.keywords = keywords;
                self.finish(OperationKind::Keywords, pending, true);
                Completion::Succeeded
            }
            Err(message) => {
                self.record.keywords.clear();
                self.finish(OperationKind::Keywords, pending, false);
                if pending.secondary {
                    Completion::SecondaryFailed(message)
                } else {
                    Completion::Failed(message)
                }
            }
        }
    }

    pub(crate) fn complete_detection(
        &mut self,
        id: RequestId,
        result: Result<String, String>,
    ) -> Completion {
        let Some(pending) = self.settle(OperationKind::DetectLanguage, id) else {
            return Completion::Stale;
        };
        match result {
            Ok(code) => {
                self.record.detected_language_code = Some(code);
                self.record.detected_language_name = None;
                self.finish(OperationKind::DetectLanguage, pending, true);
                Completion::Succeeded
            }
            Err(message) => {
                self.finish(OperationKind::DetectLanguage, pending, false);
                Completion::Failed(message)
            }
        }
    }

    /// Export writes no result fields; a canceled dialog returns to `Idle`.
    pub(crate) fn complete_export(
        &mut self,
        id: RequestId,
        result: Result<bool, String>,
    ) -> Completion {
        let Some(pending) = self.settle(OperationKind::Export, id) else {
            return Completion::Stale;
        };
        match result {
            Ok(true) => {
                self.finish(OperationKind::Export, pending, true);
                Completion::Succeeded
            }
            Ok(false) => {
                self.export.lifecycle = Lifecycle::Idle;
                Completion::Succeeded
            }
            Err(message) => {
                self.finish(OperationKind::Export, pending, false);
                Completion::Failed(message)
            }
        }
    }
}
