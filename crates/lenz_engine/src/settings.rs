use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::persist::{write_atomically, PersistError};

pub const DEFAULT_UI_LANGUAGE: &str = "ko";
pub const SUPPORTED_UI_LANGUAGES: [&str; 2] = ["ko", "en"];

const SETTINGS_FILE: &str = "settings.json";

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(rename = "apiUrl", default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_language() -> String {
    DEFAULT_UI_LANGUAGE.to_string()
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            api_url: None,
        }
    }
}

impl StoredSettings {
    fn sanitized(mut self) -> Self {
        if !SUPPORTED_UI_LANGUAGES.contains(&self.language.as_str()) {
            engine_warn!(
                "Unsupported UI language '{}' in settings; using '{DEFAULT_UI_LANGUAGE}'",
                self.language
            );
            self.language = default_language();
        }
        self.api_url = self
            .api_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }
}

/// Flat JSON settings document on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$HOME/.config/contents-lenz/settings.json`, or `./settings.json` without a home.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home)
                .join(".config")
                .join("contents-lenz")
                .join(SETTINGS_FILE),
            _ => PathBuf::from(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable documents yield defaults.
    pub fn load(&self) -> StoredSettings {
        match self.read_document() {
            Ok(Some(document)) => {
                match serde_json::from_value::<StoredSettings>(Value::Object(document)) {
                    Ok(settings) => settings.sanitized(),
                    Err(err) => {
                        engine_warn!("Ignoring invalid settings in {}: {err}", self.path.display());
                        StoredSettings::default()
                    }
                }
            }
            Ok(None) => StoredSettings::default(),
            Err(err) => {
                engine_warn!("Could not read settings {}: {err}", self.path.display());
                StoredSettings::default()
            }
        }
    }

    /// Writes known keys and keeps any others already in the document.
    pub fn save(&self, settings: &StoredSettings) -> Result<(), PersistError> {
        let mut document = match self.read_document() {
            Ok(Some(document)) => document,
            Ok(None) => Map::new(),
            Err(err) => {
                engine_warn!("Replacing unreadable settings {}: {err}", self.path.display());
                Map::new()
            }
        };
        document.insert("language".into(), Value::String(settings.language.clone()));
        match settings.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                document.insert("apiUrl".into(), Value::String(url.to_string()));
            }
            _ => {
                document.remove("apiUrl");
            }
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))?;
        write_atomically(&self.path, &bytes)?;
        engine_info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.to_string()),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => Err("settings document is not an object".to_string()),
            Err(err) => Err(err.to_string()),
        }
    }
}
