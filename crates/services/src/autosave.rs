//! Debounced periodic autosave.
//!
//! Two-stage timing: a short settle delay restarts on every edit, and
//! only once content has been stable for the settle period does the
//! longer interval begin. This avoids saving on every keystroke while a
//! continuously edited document still saves well before the interval
//! alone would elapse.

use crate::gateway::DraftGateway;
use crate::session::SessionState;
use crate::tracker::ChangeTracker;
use domains::{FormSnapshot, Notice, Notifier};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

/// Timing knobs for one scheduler.
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Editing must stop this long before the interval starts.
    pub settle: Duration,
    /// Periodic delay once content has settled.
    pub interval: Duration,
    /// User-visible success/error notices per session; later outcomes
    /// are traced only.
    pub max_notices: u32,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(2),
            interval: Duration::from_secs(28),
            max_notices: 3,
        }
    }
}

/// Timer state of the scheduler task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    /// No unsaved edits observed.
    Idle,
    /// Edits seen; waiting for typing to settle.
    PendingSettle,
    /// Content stable; waiting out the periodic delay.
    PendingInterval,
    /// Guards passed; the save itself runs now.
    Saving,
}

/// Owns the scheduler. Dropping the handle closes the edit channel,
/// which cancels all pending timers: no save starts after the owning
/// editor is gone, while a save already past its guards is allowed to
/// finish and its result is simply ignored.
pub struct AutosaveHandle {
    edits: mpsc::UnboundedSender<()>,
}

impl AutosaveHandle {
    /// Tells the scheduler the tracked content changed.
    pub fn content_changed(&self) {
        // A closed channel means the task already exited; nothing to do.
        let _ = self.edits.send(());
    }
}

pub struct AutosaveScheduler {
    form: Arc<Mutex<FormSnapshot>>,
    state: Arc<SessionState>,
    tracker: Arc<ChangeTracker>,
    gateway: Arc<DraftGateway>,
    notifier: Arc<dyn Notifier>,
    config: AutosaveConfig,
    notices_sent: u32,
}

impl AutosaveScheduler {
    /// Spawns the scheduler task and returns its owning handle.
    pub fn spawn(
        form: Arc<Mutex<FormSnapshot>>,
        state: Arc<SessionState>,
        tracker: Arc<ChangeTracker>,
        gateway: Arc<DraftGateway>,
        notifier: Arc<dyn Notifier>,
        config: AutosaveConfig,
    ) -> AutosaveHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            form,
            state,
            tracker,
            gateway,
            notifier,
            config,
            notices_sent: 0,
        };
        tokio::spawn(scheduler.run(rx));
        AutosaveHandle { edits: tx }
    }

    async fn run(mut self, mut edits: mpsc::UnboundedReceiver<()>) {
        let mut state = TimerState::Idle;
        loop {
            state = match state {
                TimerState::Idle => {
                    // Nothing timed; wait for the next edit.
                    match edits.recv().await {
                        Some(()) => TimerState::PendingSettle,
                        None => return,
                    }
                }
                TimerState::PendingSettle => {
                    tokio::select! {
                        changed = edits.recv() => match changed {
                            // Another keystroke: the settle timer restarts.
                            Some(()) => TimerState::PendingSettle,
                            None => return,
                        },
                        () = time::sleep(self.config.settle) => TimerState::PendingInterval,
                    }
                }
                TimerState::PendingInterval => {
                    tokio::select! {
                        changed = edits.recv() => match changed {
                            Some(()) => TimerState::PendingSettle,
                            None => return,
                        },
                        () = time::sleep(self.config.interval) => TimerState::Saving,
                    }
                }
                TimerState::Saving => self.try_save().await,
            };
        }
    }

    /// Runs one save attempt. The busy checks happen here, immediately
    /// before executing, not when the timers were armed.
    async fn try_save(&mut self) -> TimerState {
        if self.state.submission_in_flight() {
            debug!("autosave deferred: submission in flight");
            return TimerState::PendingSettle;
        }
        let writer_state = Arc::clone(&self.state);
        let Ok(_writer) = writer_state.writer.try_lock() else {
            debug!("autosave deferred: manual save in flight");
            return TimerState::PendingSettle;
        };

        let snapshot = self.form.lock().expect("form mutex poisoned").clone();
        if !self.tracker.is_dirty(&snapshot) {
            return TimerState::Idle;
        }

        match self.gateway.persist(&self.state, &snapshot).await {
            Ok(id) => {
                self.tracker.mark_saved(&snapshot);
                info!(draft_id = %id, "autosaved");
                self.notify(Notice::info("Draft saved", "Autosaved in the background."));
                TimerState::Idle
            }
            Err(err) => {
                // Stays dirty; the next tick or a manual save retries.
                self.tracker.mark_failed();
                warn!(error = %err, "autosave failed");
                self.notify(Notice::error("Autosave failed", err.to_string()));
                TimerState::PendingSettle
            }
        }
    }

    /// Rate-limited notification: long editing sessions are not flooded
    /// with "saved" toasts, but every outcome is still traced above.
    fn notify(&mut self, notice: Notice) {
        if self.notices_sent >= self.config.max_notices {
            debug!(title = %notice.title, "autosave notice suppressed");
            return;
        }
        self.notices_sent += 1;
        self.notifier.notify(notice);
    }
}
