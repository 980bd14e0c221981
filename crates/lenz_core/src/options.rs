/// Number of keywords requested from the API.
pub const KEYWORD_COUNT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => Some(SummaryLength::Short),
            "medium" => Some(SummaryLength::Medium),
            "long" => Some(SummaryLength::Long),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Paragraph,
    Bullet,
    Structured,
}

impl SummaryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryFormat::Paragraph => "paragraph",
            SummaryFormat::Bullet => "bullet",
            SummaryFormat::Structured => "structured",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "paragraph" => Some(SummaryFormat::Paragraph),
            "bullet" => Some(SummaryFormat::Bullet),
            "structured" => Some(SummaryFormat::Structured),
            _ => None,
        }
    }
}

/// Target language of a summary: `auto` (keep the source language) or an
/// ISO-639-1 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLanguage(String);

impl OutputLanguage {
    pub const AUTO: &'static str = "auto";

    pub fn auto() -> Self {
        Self(Self::AUTO.to_string())
    }

    /// Accepts `auto` or a two-letter ASCII code, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_lowercase();
        if code == Self::AUTO {
            return Some(Self::auto());
        }
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase()) {
            return Some(Self(code));
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == Self::AUTO
    }
}

impl Default for OutputLanguage {
    fn default() -> Self {
        Self::auto()
    }
}

/// Fully populated options sent with every summarize call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryOptions {
    pub length: SummaryLength,
    pub format: SummaryFormat,
    pub language: OutputLanguage,
}
