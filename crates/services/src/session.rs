//! Editor session wiring.
//!
//! One `EditorSession` per open editor: it owns the live form handle,
//! the shared coordination state and the three write paths (manual
//! save, autosave, submission).

use crate::autosave::{AutosaveConfig, AutosaveHandle, AutosaveScheduler};
use crate::gateway::DraftGateway;
use crate::guard::OpGuard;
use crate::manual::{ManualSaveController, SaveOutcome};
use crate::submit::{SubmissionOrchestrator, SubmissionReceipt};
use crate::tracker::ChangeTracker;
use domains::{
    ArticleRecord, ArticleStore, DraftId, FormSnapshot, IdentityProvider, Notifier, Result,
};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// State shared between the manual controller, the autosave scheduler
/// and the submission orchestrator.
pub struct SessionState {
    /// Set by whichever path first successfully inserts; read-through
    /// by every later save or submission.
    draft_id: Mutex<Option<DraftId>>,
    /// Single-writer lock over all gateway writes. Saves `try_lock`
    /// and back off; submission holds it across its write section.
    pub(crate) writer: tokio::sync::Mutex<()>,
    /// Rejects a second concurrent submit before any store traffic.
    pub(crate) submitting: OpGuard,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            draft_id: Mutex::new(None),
            writer: tokio::sync::Mutex::new(()),
            submitting: OpGuard::new(),
        }
    }

    /// The persisted identifier, once any path has created the record.
    pub fn draft_id(&self) -> Option<DraftId> {
        *self.draft_id.lock().expect("session mutex poisoned")
    }

    /// Publishes the first-save id. Later calls are ignored; only the
    /// path that created the record decides the identifier.
    pub(crate) fn record_draft_id(&self, id: DraftId) {
        let mut slot = self.draft_id.lock().expect("session mutex poisoned");
        match *slot {
            None => *slot = Some(id),
            Some(existing) if existing == id => {}
            Some(existing) => {
                warn!(%existing, %id, "ignoring conflicting draft id");
            }
        }
    }

    pub fn submission_in_flight(&self) -> bool {
        self.submitting.is_busy()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// The client-resident controller for one open editor.
pub struct EditorSession {
    form: Arc<Mutex<FormSnapshot>>,
    state: Arc<SessionState>,
    tracker: Arc<ChangeTracker>,
    manual: ManualSaveController,
    orchestrator: SubmissionOrchestrator,
    autosave: AutosaveHandle,
}

impl EditorSession {
    /// Opens a session on a brand-new, never-saved draft.
    pub fn new(
        store: Arc<dyn ArticleStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
        autosave: AutosaveConfig,
    ) -> Self {
        let form = Arc::new(Mutex::new(FormSnapshot::default()));
        let state = Arc::new(SessionState::new());
        let tracker = Arc::new(ChangeTracker::new());
        let gateway = Arc::new(DraftGateway::new(store.clone(), identity.clone()));

        let manual = ManualSaveController::new(
            state.clone(),
            tracker.clone(),
            gateway.clone(),
            notifier.clone(),
        );
        let orchestrator = SubmissionOrchestrator::new(
            state.clone(),
            gateway.clone(),
            store,
            identity,
            notifier.clone(),
        );
        let autosave = AutosaveScheduler::spawn(
            form.clone(),
            state.clone(),
            tracker.clone(),
            gateway,
            notifier,
            autosave,
        );

        Self {
            form,
            state,
            tracker,
            manual,
            orchestrator,
            autosave,
        }
    }

    /// Reopens a session on an existing record (re-edit path). The form
    /// is seeded from the record and starts clean.
    pub fn resume(
        store: Arc<dyn ArticleStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
        autosave: AutosaveConfig,
        record: &ArticleRecord,
    ) -> Self {
        let session = Self::new(store, identity, notifier, autosave);
        let snapshot = FormSnapshot::of_record(record);
        session.state.record_draft_id(record.id);
        session.tracker.mark_saved(&snapshot);
        *session.form.lock().expect("form mutex poisoned") = snapshot;
        session
    }

    /// Applies one edit to the live form model and signals the autosave
    /// scheduler.
    pub fn edit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut FormSnapshot),
    {
        mutate(&mut self.form.lock().expect("form mutex poisoned"));
        self.autosave.content_changed();
    }

    /// A frozen copy of the current form model.
    pub fn snapshot(&self) -> FormSnapshot {
        self.form.lock().expect("form mutex poisoned").clone()
    }

    pub fn draft_id(&self) -> Option<DraftId> {
        self.state.draft_id()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty(&self.snapshot())
    }

    /// Immediate, user-triggered save of the current form.
    pub async fn save_now(&self) -> Result<SaveOutcome> {
        let snapshot = self.snapshot();
        self.manual.save_now(&snapshot).await
    }

    /// Finalizes the draft and sends it for review.
    pub async fn submit(&self) -> Result<SubmissionReceipt> {
        let snapshot = self.snapshot();
        self.orchestrator.submit(&snapshot).await
    }
}
