//! Mutation watch — owns the attachment sweep's lifecycle.
//!
//! The original design hung a page-wide observer off implicit global
//! state; here it is an owned resource. [`ComposerObserver::start`] runs
//! one sweep immediately, then one per document revision, until
//! [`ComposerObserver::stop`] or until the document goes away.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::attach::AttachmentController;

/// Handle on the running watch task.
pub struct ComposerObserver {
    task: JoinHandle<()>,
}

impl ComposerObserver {
    /// Start watching the controller's document.
    pub fn start(controller: Arc<AttachmentController>) -> Self {
        let mut revisions = controller.page().lock().unwrap().watch_revisions();
        let task = tokio::spawn(async move {
            controller.sweep();
            while revisions.changed().await.is_ok() {
                controller.sweep();
            }
            log::debug!("[COMPOSER] Document dropped — observer stopping");
        });
        Self { task }
    }

    /// Stop watching. Controls already injected stay on the page.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ComposerObserver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
