//! Message relay — the boundary between the composer side and the
//! background service.
//!
//! The composer side holds only a [`RelayHandle`]; the background task owns
//! the settings store and the generator. A request carries its own reply
//! sender, and that sender is resolved only after the full generation
//! pipeline has finished — exactly one response per request, never early.
//! Requests are served concurrently so one slow generation does not stall
//! an unrelated composer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::llm::{self, ReplyGenerator};
use crate::settings::SettingsStore;

const RELAY_CHANNEL_CAPACITY: usize = 16;

/// Payload of one generate-reply request.
///
/// Explicit fields override the stored defaults; `None` (or an empty tone,
/// or a zero limit) falls back to the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    pub tweet: String,
    #[serde(default)]
    pub context: String,
    pub tone: Option<String>,
    pub max_chars: Option<u32>,
    pub emoji: Option<bool>,
}

/// Response crossing back over the boundary: `{ok, text}` or `{ok, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(message.into()),
        }
    }
}

enum RelayRequest {
    GenerateReply {
        payload: GeneratePayload,
        reply: oneshot::Sender<ReplyResponse>,
    },
}

/// The composer side's end of the channel.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayRequest>,
}

impl RelayHandle {
    /// Send one request and wait for its response. A dead background task
    /// answers as a failure, never as a hang or a panic.
    pub async fn generate_reply(&self, payload: GeneratePayload) -> ReplyResponse {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .tx
            .send(RelayRequest::GenerateReply {
                payload,
                reply: reply_tx,
            })
            .await
            .is_err()
        {
            return ReplyResponse::failure("Background service is not running");
        }
        reply_rx
            .await
            .unwrap_or_else(|_| ReplyResponse::failure("Background service dropped the request"))
    }
}

/// Spawn the background service and hand back the channel into it.
pub fn spawn_background(store: SettingsStore, generator: Arc<dyn ReplyGenerator>) -> RelayHandle {
    let (tx, mut rx) = mpsc::channel(RELAY_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            match request {
                RelayRequest::GenerateReply { payload, reply } => {
                    let store = store.clone();
                    let generator = Arc::clone(&generator);
                    tokio::spawn(async move {
                        let response = handle_generate(&store, generator.as_ref(), payload).await;
                        // Receiver gone means the requester navigated away;
                        // the result is discarded, not an error.
                        let _ = reply.send(response);
                    });
                }
            }
        }
        log::info!("[RELAY] All handles dropped — background service stopping");
    });
    RelayHandle { tx }
}

/// Full pipeline for one request: settings snapshot, override resolution,
/// prompt build, model call, error folding.
async fn handle_generate(
    store: &SettingsStore,
    generator: &dyn ReplyGenerator,
    payload: GeneratePayload,
) -> ReplyResponse {
    let settings = store.get();

    let tone = match payload.tone {
        Some(tone) if !tone.is_empty() => tone,
        _ => settings.tone.clone(),
    };
    let max_chars = match payload.max_chars {
        Some(limit) if limit != 0 => limit,
        _ => settings.max_chars,
    };
    let emoji = payload.emoji.unwrap_or(settings.emoji_enabled);

    let prompt = llm::build_reply_prompt(&llm::ReplyPrompt {
        tweet: &payload.tweet,
        context: &payload.context,
        tone: &tone,
        max_chars,
        emoji,
    });

    log::info!(
        "[RELAY] Generating reply — tone {}, limit {}, {} prompt chars",
        tone,
        max_chars,
        prompt.len()
    );

    match generator.generate(&prompt, &settings.resolved_api_key()).await {
        Ok(text) => ReplyResponse::success(text),
        Err(e) => {
            log::warn!("[RELAY] Generation failed: {}", e);
            ReplyResponse::failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_wire_shape_is_ok_plus_one_field() {
        let ok = serde_json::to_value(ReplyResponse::success("hi")).unwrap();
        assert_eq!(ok, serde_json::json!({"ok": true, "text": "hi"}));

        let err = serde_json::to_value(ReplyResponse::failure("nope")).unwrap();
        assert_eq!(err, serde_json::json!({"ok": false, "error": "nope"}));
    }

    #[test]
    fn payload_uses_camel_case_on_the_wire() {
        let payload: GeneratePayload = serde_json::from_value(serde_json::json!({
            "tweet": "t",
            "context": "c",
            "maxChars": 120
        }))
        .unwrap();
        assert_eq!(payload.max_chars, Some(120));
        assert_eq!(payload.tone, None);
    }
}
