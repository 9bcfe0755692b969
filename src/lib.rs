//! replymate — AI reply suggestions for the X/Twitter reply composer.
//!
//! This is the wiring layer; no business logic lives here. Behavior is
//! split across the domains:
//!   - settings.rs — persisted user preferences
//!   - llm/        — prompt assembly + the Gemini call
//!   - relay.rs    — the composer-to-background request channel
//!   - composer/   — page model, element discovery, control injection
//!   - options.rs  — the preferences form

pub mod composer;
pub mod llm;
pub mod options;
pub mod relay;
pub mod settings;

pub use relay::{spawn_background, GeneratePayload, RelayHandle, ReplyResponse};
pub use settings::{Settings, SettingsPatch, SettingsStore};

/// Load `.env.local` → `.env` from the project root.
///
/// Uses `CARGO_MANIFEST_DIR` (compile-time path to the crate) to find the
/// project root regardless of the binary's working directory. Call before
/// initializing the logger.
pub fn init_env() {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    for env_file in [".env.local", ".env"] {
        let path = manifest_dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(()) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break;
        }
    }
}
