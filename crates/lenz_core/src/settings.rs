/// Locale of the shell's own text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiLanguage {
    #[default]
    Ko,
    En,
}

impl UiLanguage {
    pub const SUPPORTED: [UiLanguage; 2] = [UiLanguage::Ko, UiLanguage::En];

    pub fn code(self) -> &'static str {
        match self {
            UiLanguage::Ko => "ko",
            UiLanguage::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// The only state that outlives the process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub ui_language: UiLanguage,
    pub api_url: Option<String>,
}

/// Trims an endpoint override; blank means "use the default endpoint".
/// Returns `Err(())` when the value is not an http(s) address.
pub(crate) fn normalize_endpoint(raw: Option<&str>) -> Result<Option<String>, ()> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let lower = trimmed.to_ascii_lowercase();
    let has_scheme = lower.starts_with("http://") || lower.starts_with("https://");
    let has_host = trimmed.split_once("://").is_some_and(|(_, rest)| !rest.is_empty());
    if has_scheme && has_host {
        Ok(Some(trimmed.trim_end_matches('/').to_string()))
    } else {
        Err(())
    }
}
