//! Options form — a 1:1 binding over the settings store.
//!
//! Load populates the four fields from stored settings; submit clamps the
//! length cap into [80,260], writes everything back, and shows a transient
//! "Saved" status. The clamp lives here, not in the store.

use std::time::{Duration, Instant};

use crate::llm::TONES;
use crate::settings::{SettingsPatch, SettingsStore, DEFAULT_MAX_CHARS};

pub const MIN_MAX_CHARS: u32 = 80;
pub const MAX_MAX_CHARS: u32 = 260;

/// How long the status line stays up after a submit.
const STATUS_TTL: Duration = Duration::from_millis(1200);

/// The options form state: four editable fields plus a status line.
pub struct OptionsForm {
    store: SettingsStore,
    pub api_key: String,
    pub tone: String,
    /// Raw field text; parsed and clamped on submit.
    pub max_chars: String,
    pub emoji_enabled: bool,
    status: Option<(String, Instant)>,
}

impl OptionsForm {
    /// Populate the form from the store (defaults when nothing is saved).
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.get();
        Self {
            store,
            api_key: settings.api_key,
            tone: settings.tone,
            max_chars: settings.max_chars.to_string(),
            emoji_enabled: settings.emoji_enabled,
            status: None,
        }
    }

    /// Persist all four fields.
    ///
    /// The length cap parses with a fallback of [`DEFAULT_MAX_CHARS`] and
    /// clamps into `[MIN_MAX_CHARS, MAX_MAX_CHARS]`; the field is updated
    /// to show what was actually saved. A storage failure lands in the
    /// status line instead of "Saved".
    pub fn submit(&mut self) {
        let max_chars = self
            .max_chars
            .trim()
            .parse::<u32>()
            .unwrap_or(DEFAULT_MAX_CHARS)
            .clamp(MIN_MAX_CHARS, MAX_MAX_CHARS);

        let patch = SettingsPatch {
            api_key: Some(self.api_key.trim().to_string()),
            tone: Some(self.tone.clone()),
            max_chars: Some(max_chars),
            emoji_enabled: Some(self.emoji_enabled),
        };

        let message = match self.store.set(patch) {
            Ok(()) => {
                self.max_chars = max_chars.to_string();
                "Saved".to_string()
            }
            Err(e) => e,
        };
        self.status = Some((message, Instant::now()));
    }

    /// Transient status line; gone [`STATUS_TTL`] after the last submit.
    pub fn status(&self) -> Option<&str> {
        match &self.status {
            Some((message, shown_at)) if shown_at.elapsed() < STATUS_TTL => Some(message),
            _ => None,
        }
    }

    /// The tones the selector offers.
    pub fn tones(&self) -> &'static [&'static str] {
        &TONES
    }
}
