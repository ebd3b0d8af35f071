//! Manual save.
//!
//! An explicit, immediate save. At most one is in flight at a time;
//! concurrent callers are told `Skipped` rather than queued, and a
//! clean form is never re-sent to the store.

use crate::gateway::DraftGateway;
use crate::session::SessionState;
use crate::tracker::ChangeTracker;
use domains::{DraftId, FormSnapshot, Notice, Notifier, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one explicit save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A write reached the store.
    Saved(DraftId),
    /// Nothing was dirty; nothing was sent.
    Clean,
    /// Another save or a submission is in flight; treated as a no-op.
    Skipped,
}

pub struct ManualSaveController {
    state: Arc<SessionState>,
    tracker: Arc<ChangeTracker>,
    gateway: Arc<DraftGateway>,
    notifier: Arc<dyn Notifier>,
}

impl ManualSaveController {
    pub fn new(
        state: Arc<SessionState>,
        tracker: Arc<ChangeTracker>,
        gateway: Arc<DraftGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state,
            tracker,
            gateway,
            notifier,
        }
    }

    /// Saves the snapshot right now, unless a conflicting operation
    /// holds the writer lock or there is nothing to write.
    pub async fn save_now(&self, snapshot: &FormSnapshot) -> Result<SaveOutcome> {
        if self.state.submission_in_flight() {
            debug!("manual save skipped: submission in flight");
            return Ok(SaveOutcome::Skipped);
        }
        // AlreadyInProgress is absorbed here; it never reaches the user.
        let Ok(_writer) = self.state.writer.try_lock() else {
            debug!("manual save skipped: another save holds the writer lock");
            return Ok(SaveOutcome::Skipped);
        };

        if !self.tracker.is_dirty(snapshot) && !self.tracker.last_save_failed() {
            debug!("manual save skipped: form is clean");
            return Ok(SaveOutcome::Clean);
        }

        match self.gateway.persist(&self.state, snapshot).await {
            Ok(id) => {
                self.tracker.mark_saved(snapshot);
                self.notifier
                    .notify(Notice::info("Saved", "Your draft has been saved."));
                Ok(SaveOutcome::Saved(id))
            }
            Err(err) => {
                // The lock drops on return, so a later retry can proceed.
                self.tracker.mark_failed();
                warn!(error = %err, "manual save failed");
                self.notifier
                    .notify(Notice::error("Save failed", err.to_string()));
                Err(err)
            }
        }
    }
}
