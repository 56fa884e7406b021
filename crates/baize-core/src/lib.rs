pub mod catalog;
pub mod commerce;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// --- Types (matching the storefront's wire format) ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Cue,
    Table,
    Accessory,
    Balls,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cue => "cue",
            Category::Table => "table",
            Category::Accessory => "accessory",
            Category::Balls => "balls",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Sport {
    Snooker,
    Pool,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub sport: Sport,
    pub description: String,
    pub image_url: String,
    pub rating: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub goal: String,
    #[serde(rename = "type")]
    pub sport: Sport,
}

/// A canned encyclopedia question. `prompt` is what gets sent; the title is
/// what the conversation shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guide {
    pub title: String,
    pub description: String,
    pub prompt: String,
}

/// Marketplace filter tabs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MarketFilter {
    #[default]
    All,
    Snooker,
    Pool,
    /// Accessories and ball sets.
    Accessory,
}

impl MarketFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            MarketFilter::All => true,
            MarketFilter::Accessory => {
                matches!(product.category, Category::Accessory | Category::Balls)
            }
            MarketFilter::Snooker => matches!(product.sport, Sport::Snooker | Sport::Both),
            MarketFilter::Pool => matches!(product.sport, Sport::Pool | Sport::Both),
        }
    }
}

// --- AI Settings ---

pub const DEFAULT_PROVIDER: &str = "google";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables checked (in order) for the API credential.
pub const API_KEY_VARS: [&str; 2] = ["BAIZE_API_KEY", "API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings encode: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    /// Overlay the API key from the environment, if one is set.
    pub fn with_env_key(mut self) -> Self {
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
        {
            self.api_key = key;
        }
        self
    }
}

/// Resolve the settings directory (~/.baize/).
pub fn settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".baize")
}

pub fn settings_path() -> PathBuf {
    settings_dir().join("settings.json")
}

/// Read settings from the default location. Missing or unreadable files
/// yield defaults.
pub fn read_settings() -> AiSettings {
    read_settings_from(&settings_path())
}

pub fn read_settings_from(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    match fs::read_to_string(path).map(|s| serde_json::from_str(&s)) {
        Ok(Ok(settings)) => settings,
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            AiSettings::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            AiSettings::default()
        }
    }
}

pub fn write_settings(settings: &AiSettings) -> Result<(), SettingsError> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accessory_includes_balls() {
        let products = catalog::products();
        let ids: Vec<&str> = products
            .iter()
            .filter(|p| MarketFilter::Accessory.matches(p))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "5", "7", "8"]);
    }

    #[test]
    fn test_filter_sport_includes_both() {
        let products = catalog::products();
        let pool: Vec<&str> = products
            .iter()
            .filter(|p| MarketFilter::Pool.matches(p))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(pool, vec!["3", "4", "5", "7"]);
    }

    #[test]
    fn test_settings_roundtrip_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        assert_eq!(read_settings_from(&path), AiSettings::default());

        let settings = AiSettings {
            provider: "openai".into(),
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            timeout_secs: 5,
        };
        write_settings_to(&path, &settings).unwrap();
        assert_eq!(read_settings_from(&path), settings);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"apiKey":"abc"}"#).unwrap();

        let settings = read_settings_from(&path);
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.provider, DEFAULT_PROVIDER);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(read_settings_from(&path), AiSettings::default());
    }

    #[test]
    fn test_ai_configured() {
        let mut settings = AiSettings::default();
        assert!(!ai_configured(&settings));
        settings.api_key = "key".into();
        assert!(ai_configured(&settings));
        settings.provider = "ollama".into();
        settings.api_key.clear();
        assert!(ai_configured(&settings));
    }
}
