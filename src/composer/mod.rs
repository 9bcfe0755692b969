//! Composer domain — the page-facing side of the assistant.
//!
//! This module owns everything that touches the (synthetic) page:
//!   - dom.rs      — the document tree and its mutation revisions
//!   - locator.rs  — swappable element-discovery strategies
//!   - attach.rs   — control injection + the generate-click protocol
//!   - observer.rs — the owned mutation-watch lifecycle
//!
//! External code should only use the items exported here.

pub mod attach;
pub mod dom;
pub mod locator;
pub mod observer;

pub use attach::{AttachmentController, ComposerBinding, GENERATE_BUTTON_ID, GROUP_ID, TONE_SELECT_ID};
pub use dom::{Document, NodeId, SharedDocument};
pub use locator::{ComposerLocator, StructuralLocator, ThreadText};
pub use observer::ComposerObserver;
