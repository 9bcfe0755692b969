//! User preference persistence.
//!
//! Four settings back the assistant: the Gemini API key, the default reply
//! tone, the reply length cap, and the emoji toggle. They are stored as
//! pretty JSON in `~/.config/replymate/settings.json`.
//!
//! Reads never fail: a missing or unreadable file yields the documented
//! defaults, and per-field serde defaults cover partially written files.
//! Writes are read-merge-write so a patch only touches the fields it names.
//! Range validation (the [80,260] length clamp) is the options form's job,
//! not the store's — the store persists whatever it is given.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TONE: &str = "Friendly";
pub const DEFAULT_MAX_CHARS: u32 = 200;

/// The persisted preference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub tone: String,
    pub max_chars: u32,
    pub emoji_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            tone: DEFAULT_TONE.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            emoji_enabled: true,
        }
    }
}

impl Settings {
    /// Key used for generation: the stored value when present, otherwise
    /// the `GEMINI_API_KEY` environment variable. Empty means unconfigured.
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("GEMINI_API_KEY").unwrap_or_default()
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub api_key: Option<String>,
    pub tone: Option<String>,
    pub max_chars: Option<u32>,
    pub emoji_enabled: Option<bool>,
}

/// Handle on the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at the per-user default location.
    pub fn open() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("replymate")
            .join("settings.json");
        Self { path }
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current settings snapshot. Missing or invalid files read as defaults.
    pub fn get(&self) -> Settings {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }

    /// Merge the patch into the stored settings and persist.
    ///
    /// Creates the settings directory if it doesn't exist.
    pub fn set(&self, patch: SettingsPatch) -> Result<(), String> {
        let mut settings = self.get();
        if let Some(api_key) = patch.api_key {
            settings.api_key = api_key;
        }
        if let Some(tone) = patch.tone {
            settings.tone = tone;
        }
        if let Some(max_chars) = patch.max_chars {
            settings.max_chars = max_chars;
        }
        if let Some(emoji_enabled) = patch.emoji_enabled {
            settings.emoji_enabled = emoji_enabled;
        }

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create settings dir: {}", e))?;
        }
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write settings: {}", e))?;
        log::info!("[SETTINGS] Saved {}", self.path.display());
        Ok(())
    }
}
