//! Gemini reply generation — one-shot `generateContent` call.
//!
//! Google AI API specifics:
//! - API key in a URL query param, not a header
//! - prompt sent as a single user-role part in `contents`
//! - reply text in `candidates[0].content.parts[0].text`
//!
//! A non-2xx response is a hard failure carrying status and raw body. A
//! structurally missing candidate degrades to an empty string instead of
//! an error, so a partial API response never breaks the composer UI.
//! No retries and no explicit timeout beyond the transport default.

use super::ReplyGenerator;
use async_trait::async_trait;

pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Failures the generation call can surface.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Missing Gemini API key. Set it in the assistant options.")]
    MissingCredential,

    #[error("Gemini API error: {status} {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_base_url(GEMINI_BASE_URL)
    }

    /// Client against a different host — tests point this at a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError> {
        if api_key.is_empty() {
            return Err(GenerateError::MissingCredential);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            GEMINI_MODEL,
            urlencoding::encode(api_key)
        );

        let start = std::time::Instant::now();
        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{"text": prompt}]
                    }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[LLM] Gemini API returned {}: {}", status, body);
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());

        Ok(extract_candidate_text(&body)
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

/// First candidate's first text part, or `None` if the path is absent.
fn extract_candidate_text(body: &serde_json::Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_text_follows_the_response_path() {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "a reply"}]}}]
        });
        assert_eq!(extract_candidate_text(&body), Some("a reply"));
    }

    #[test]
    fn missing_path_is_none_not_panic() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({"candidates": []}),
            serde_json::json!({"candidates": [{"content": {}}]}),
            serde_json::json!({"candidates": [{"content": {"parts": []}}]}),
        ] {
            assert_eq!(extract_candidate_text(&body), None);
        }
    }
}
