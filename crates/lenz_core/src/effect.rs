use crate::{OutputLanguage, RequestId, Settings, SummaryOptions, SummarySource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckApiStatus,
    SelectFile,
    ScrapeUrl {
        request_id: RequestId,
        url: String,
        use_ai_filter: bool,
    },
    Summarize {
        request_id: RequestId,
        source: SummarySource,
        options: SummaryOptions,
    },
    ExtractKeywords {
        request_id: RequestId,
        text: String,
        count: u32,
        language: OutputLanguage,
    },
    DetectLanguage {
        request_id: RequestId,
        text: String,
    },
    SaveSummary {
        request_id: RequestId,
        summary: String,
        suggested_name: String,
    },
    /// Must run before any effect that follows it in the same batch.
    ReconfigureEndpoint { api_url: Option<String> },
    PersistSettings(Settings),
}
