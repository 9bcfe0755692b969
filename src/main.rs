//! CLI front door — one-shot generation and preference editing.
//!
//! `generate` runs a real request through the background relay against the
//! live Gemini endpoint; `configure` drives the same form the options page
//! binds to, clamp included.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use replymate::llm::GeminiClient;
use replymate::options::OptionsForm;
use replymate::relay::GeneratePayload;
use replymate::settings::SettingsStore;

#[derive(Parser)]
#[command(name = "replymate", about = "AI reply suggestions for the reply composer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a reply to a tweet
    Generate {
        /// The tweet text to reply to
        tweet: String,
        /// Surrounding thread context
        #[arg(long, default_value = "")]
        context: String,
        /// Override the stored tone for this request
        #[arg(long)]
        tone: Option<String>,
        /// Override the stored length cap for this request
        #[arg(long)]
        max_chars: Option<u32>,
        /// Override the stored emoji policy for this request
        #[arg(long)]
        emoji: Option<bool>,
    },
    /// Show or update stored preferences
    Configure {
        /// Gemini API key
        #[arg(long)]
        api_key: Option<String>,
        /// Default reply tone (Friendly, Professional, Witty, Neutral)
        #[arg(long)]
        tone: Option<String>,
        /// Default reply length cap
        #[arg(long)]
        max_chars: Option<u32>,
        /// Default emoji policy
        #[arg(long)]
        emoji: Option<bool>,
        /// Print current settings and exit
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    replymate::init_env();
    env_logger::init();

    let cli = Cli::parse();
    let store = SettingsStore::open();

    match cli.command {
        Command::Generate {
            tweet,
            context,
            tone,
            max_chars,
            emoji,
        } => {
            let relay = replymate::spawn_background(store, Arc::new(GeminiClient::new()));
            let response = relay
                .generate_reply(GeneratePayload {
                    tweet,
                    context,
                    tone,
                    max_chars,
                    emoji,
                })
                .await;
            if response.ok {
                println!("{}", response.text.unwrap_or_default());
            } else {
                eprintln!(
                    "error: {}",
                    response.error.unwrap_or_else(|| "Failed to generate".to_string())
                );
                std::process::exit(1);
            }
        }
        Command::Configure {
            api_key,
            tone,
            max_chars,
            emoji,
            show,
        } => {
            if show {
                let settings = store.get();
                let key = if settings.api_key.is_empty() {
                    "(not set)".to_string()
                } else {
                    let chars: Vec<char> = settings.api_key.chars().collect();
                    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
                    format!("****{}", tail)
                };
                println!("apiKey: {}", key);
                println!("tone: {}", settings.tone);
                println!("maxChars: {}", settings.max_chars);
                println!("emojiEnabled: {}", settings.emoji_enabled);
                return;
            }

            let mut form = OptionsForm::load(store);
            if let Some(api_key) = api_key {
                form.api_key = api_key;
            }
            if let Some(tone) = tone {
                form.tone = tone;
            }
            if let Some(max_chars) = max_chars {
                form.max_chars = max_chars.to_string();
            }
            if let Some(emoji) = emoji {
                form.emoji_enabled = emoji;
            }
            form.submit();
            println!("{}", form.status().unwrap_or("Saved"));
        }
    }
}
