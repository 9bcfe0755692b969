//! Reply prompt assembly.
//!
//! The template is the contract between the assistant and the model:
//! directives first (length, tone, emoji policy, safety), then the quoted
//! thread content, then the completion cue. Tests assert the structure,
//! so changes here are contract changes.

use crate::settings::{DEFAULT_MAX_CHARS, DEFAULT_TONE};

/// Tones offered by the injected selector, the options form, and the CLI.
pub const TONES: [&str; 4] = ["Friendly", "Professional", "Witty", "Neutral"];

const EMOJI_ALLOWED: &str = "Emojis are allowed, use sparingly if helpful.";
const EMOJI_FORBIDDEN: &str = "Do not use emojis.";

/// Inputs for one reply prompt.
#[derive(Debug, Clone, Copy)]
pub struct ReplyPrompt<'a> {
    pub tweet: &'a str,
    pub context: &'a str,
    pub tone: &'a str,
    pub max_chars: u32,
    pub emoji: bool,
}

/// Build the instruction string for one reply.
///
/// Pure: no I/O, identical inputs give identical output. An empty tone
/// falls back to [`DEFAULT_TONE`], a zero limit to [`DEFAULT_MAX_CHARS`].
/// The context line appears only when context is non-empty.
pub fn build_reply_prompt(p: &ReplyPrompt) -> String {
    let tone = if p.tone.is_empty() { DEFAULT_TONE } else { p.tone };
    let limit = if p.max_chars == 0 { DEFAULT_MAX_CHARS } else { p.max_chars };
    let emoji_line = if p.emoji { EMOJI_ALLOWED } else { EMOJI_FORBIDDEN };
    let context_line = if p.context.is_empty() {
        String::new()
    } else {
        format!("Context: \"{}\"", p.context)
    };

    format!(
        r#"You are a helpful assistant composing short, respectful, context-aware replies for X/Twitter.
- Keep the reply under {limit} characters.
- Tone: {tone}.
- {emoji_line}
- Consider the images in the tweet, use the image link to see whats in the image to get a better idea of the context.
- Avoid toxicity, slurs, personal attacks, links, and hashtags unless strictly relevant.
- Keep it one concise line.

Tweet: "{tweet}"
{context_line}
Reply:"#,
        tweet = p.tweet,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(tone: &str, max_chars: u32, emoji: bool) -> String {
        build_reply_prompt(&ReplyPrompt {
            tweet: "hello world",
            context: "",
            tone,
            max_chars,
            emoji,
        })
    }

    #[test]
    fn every_combination_carries_limit_tone_and_emoji_branch() {
        for tone in TONES {
            for limit in [80u32, 200, 260] {
                for emoji in [true, false] {
                    let out = prompt(tone, limit, emoji);
                    assert!(out.contains(&format!("under {} characters", limit)));
                    assert!(out.contains(&format!("Tone: {}.", tone)));
                    if emoji {
                        assert!(out.contains(EMOJI_ALLOWED));
                        assert!(!out.contains(EMOJI_FORBIDDEN));
                    } else {
                        assert!(out.contains(EMOJI_FORBIDDEN));
                        assert!(!out.contains(EMOJI_ALLOWED));
                    }
                }
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        assert_eq!(prompt("Witty", 140, true), prompt("Witty", 140, true));
    }

    #[test]
    fn empty_tone_and_zero_limit_fall_back() {
        let out = prompt("", 0, true);
        assert!(out.contains("Tone: Friendly."));
        assert!(out.contains("under 200 characters"));
    }

    #[test]
    fn context_line_present_iff_context_nonempty() {
        let with = build_reply_prompt(&ReplyPrompt {
            tweet: "t",
            context: "earlier in the thread",
            tone: "Neutral",
            max_chars: 200,
            emoji: false,
        });
        assert!(with.contains("Context: \"earlier in the thread\""));

        let without = prompt("Neutral", 200, false);
        assert!(!without.contains("Context:"));
    }

    #[test]
    fn tweet_is_quoted_and_reply_cue_trails() {
        let out = prompt("Friendly", 200, true);
        assert!(out.contains("Tweet: \"hello world\""));
        assert!(out.ends_with("Reply:"));
    }
}
