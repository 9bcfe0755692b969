//! Generation domain — prompt assembly and the model call.
//!
//! External code should only use the items exported here:
//!   - prompts.rs — pure reply-prompt template
//!   - gemini.rs  — the Gemini `generateContent` client
//!
//! The relay talks to the model through [`ReplyGenerator`] so orchestration
//! tests can script responses without a network.

pub mod gemini;
pub mod prompts;

pub use gemini::{GeminiClient, GenerateError, GEMINI_MODEL};
pub use prompts::{build_reply_prompt, ReplyPrompt, TONES};

use async_trait::async_trait;

/// Seam between relay orchestration and the model call.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Produce one reply for the prompt, or a typed failure.
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError>;
}
