//! Composer attachment — control injection and the generate-click protocol.
//!
//! A sweep finds the open dialog's toolbar and makes sure it carries
//! exactly one injected control group (a tone selector plus the generate
//! button). Sweeps are re-entrant: the group-id check turns repeat
//! attachment attempts into no-ops, so the observer can sweep on every
//! mutation without stacking controls.
//!
//! The click protocol mirrors what a careful composer user would do by
//! hand: remember what was typed, show a placeholder while waiting, put
//! the old text back if the reply never comes.

use std::sync::Arc;
use std::time::Duration;

use super::dom::{Document, NodeId, SharedDocument};
use super::locator::ComposerLocator;
use crate::llm::TONES;
use crate::relay::{GeneratePayload, RelayHandle};

/// id on the injected wrapper; the idempotence check keys on it.
pub const GROUP_ID: &str = "replymate-group";
pub const TONE_SELECT_ID: &str = "replymate-tone";
pub const GENERATE_BUTTON_ID: &str = "replymate-generate";

/// How long transient error marks stay on the button.
pub const ERROR_FLASH: Duration = Duration::from_millis(1200);

const LOADING_PLACEHOLDER: &str = "Loading...";
const ERROR_OUTLINE: &str = "outline: 2px solid #f66";

/// One attached composer: its dialog, toolbar, and injected controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerBinding {
    pub dialog: NodeId,
    pub toolbar: NodeId,
    pub group: NodeId,
    pub tone_select: NodeId,
    pub generate_button: NodeId,
}

/// Finds composers on the shared document and runs the generate flow.
pub struct AttachmentController {
    page: SharedDocument,
    relay: RelayHandle,
    locator: Arc<dyn ComposerLocator>,
}

impl AttachmentController {
    pub fn new(
        page: SharedDocument,
        relay: RelayHandle,
        locator: Arc<dyn ComposerLocator>,
    ) -> Self {
        Self {
            page,
            relay,
            locator,
        }
    }

    pub fn page(&self) -> &SharedDocument {
        &self.page
    }

    /// One attachment sweep.
    ///
    /// Returns the binding for the open composer, injecting controls if the
    /// toolbar doesn't carry them yet. `None` when no dialog or no
    /// qualifying toolbar is present — attachment misses are silent.
    pub fn sweep(&self) -> Option<ComposerBinding> {
        let mut doc = self.page.lock().unwrap();
        let dialog = self.locator.find_dialog(&doc)?;
        let toolbar = self.locator.find_toolbar(&doc, dialog)?;

        if let Some(group) = doc.find_by_id(toolbar, GROUP_ID) {
            let tone_select = doc.find_by_id(group, TONE_SELECT_ID)?;
            let generate_button = doc.find_by_id(group, GENERATE_BUTTON_ID)?;
            return Some(ComposerBinding {
                dialog,
                toolbar,
                group,
                tone_select,
                generate_button,
            });
        }

        Some(inject_controls(&mut doc, dialog, toolbar))
    }

    /// The generate button's click handler.
    ///
    /// Captures the current textbox content, shows the loading placeholder,
    /// round-trips through the relay, then writes the reply or restores the
    /// original. The button is re-enabled whatever happens. Writes after
    /// the await re-verify the textbox is still on the page — a composer
    /// closed mid-flight just discards the result.
    pub async fn handle_generate_click(&self, binding: ComposerBinding) {
        let (textbox, original, payload) = {
            let mut doc = self.page.lock().unwrap();
            let Some(textbox) = self.locator.find_textbox(&doc, binding.dialog) else {
                log::debug!("[COMPOSER] No textbox in composer — ignoring click");
                return;
            };
            let thread = self.locator.extract_thread(&doc);
            let tone = doc
                .attr(binding.tone_select, "value")
                .unwrap_or(TONES[0])
                .to_string();
            let original = doc.text_content(textbox);

            doc.set_attr(binding.generate_button, "disabled", "true");
            doc.set_attr(binding.generate_button, "data-loading", "1");
            replace_text(&mut doc, textbox, LOADING_PLACEHOLDER);

            let payload = GeneratePayload {
                tweet: thread.tweet,
                context: thread.context,
                tone: Some(tone),
                max_chars: None,
                emoji: None,
            };
            (textbox, original, payload)
        };

        let response = self.relay.generate_reply(payload).await;

        let mut doc = self.page.lock().unwrap();
        match response.text.as_deref() {
            Some(text) if response.ok && !text.is_empty() => {
                if doc.is_attached(textbox) {
                    replace_text(&mut doc, textbox, text);
                } else {
                    log::debug!("[COMPOSER] Composer closed mid-flight — reply discarded");
                }
            }
            _ => {
                if doc.is_attached(textbox) {
                    replace_text(&mut doc, textbox, &original);
                }
                let message = response
                    .error
                    .unwrap_or_else(|| "Failed to generate".to_string());
                log::warn!("[COMPOSER] Generate failed: {}", message);
                flash_error(&mut doc, binding.generate_button, &message);
                self.spawn_error_clear(binding.generate_button);
            }
        }
        doc.remove_attr(binding.generate_button, "disabled");
        doc.remove_attr(binding.generate_button, "data-loading");
    }

    /// Clear the error marks after [`ERROR_FLASH`].
    fn spawn_error_clear(&self, button: NodeId) {
        let page = Arc::clone(&self.page);
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_FLASH).await;
            let mut doc = page.lock().unwrap();
            if doc.is_attached(button) {
                doc.remove_attr(button, "title");
                doc.remove_attr(button, "style");
            }
        });
    }
}

/// Build the control group and place it in the toolbar: after the geo
/// button's wrapper when that marker is present, appended otherwise.
fn inject_controls(doc: &mut Document, dialog: NodeId, toolbar: NodeId) -> ComposerBinding {
    let group = doc.create_element("div");
    doc.set_attr(group, "id", GROUP_ID);
    doc.set_attr(group, "role", "presentation");

    let geo_slot = doc
        .find_where(toolbar, |d, n| d.attr(n, "data-testid") == Some("geoButton"))
        .and_then(|geo| doc.parent(geo))
        .filter(|&wrapper| doc.parent(wrapper) == Some(toolbar));
    match geo_slot {
        Some(wrapper) => doc.insert_after(wrapper, group),
        None => doc.append_child(toolbar, group),
    }

    let tone_select = doc.create_element("select");
    doc.set_attr(tone_select, "id", TONE_SELECT_ID);
    doc.set_attr(tone_select, "value", TONES[0]);
    doc.append_child(group, tone_select);
    for tone in TONES {
        let option = doc.create_element("option");
        doc.set_attr(option, "value", tone);
        doc.set_text(option, tone);
        doc.append_child(tone_select, option);
    }

    let generate_button = doc.create_element("button");
    doc.set_attr(generate_button, "id", GENERATE_BUTTON_ID);
    doc.set_attr(generate_button, "type", "button");
    doc.set_attr(generate_button, "aria-label", "Generate reply");
    doc.append_child(group, generate_button);

    log::info!("[COMPOSER] Injected reply controls into toolbar");
    ComposerBinding {
        dialog,
        toolbar,
        group,
        tone_select,
        generate_button,
    }
}

/// Select-all-replace into the textbox: focus it, drop whatever was there
/// (children included — rich content doesn't survive, by contract), and
/// land the new text as the element's own text.
fn replace_text(doc: &mut Document, textbox: NodeId, text: &str) {
    doc.focus(textbox);
    for child in doc.children(textbox).to_vec() {
        doc.remove(child);
    }
    doc.set_text(textbox, text);
}

fn flash_error(doc: &mut Document, button: NodeId, message: &str) {
    doc.set_attr(button, "title", message);
    doc.set_attr(button, "style", ERROR_OUTLINE);
}
