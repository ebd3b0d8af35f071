//! draftroom/crates/services/src/lib.rs
//!
//! The client-resident draft pipeline: change tracking, debounced
//! autosave, manual-save mutual exclusion, slug generation and the
//! submission state machine. Everything here reaches the outside world
//! through the ports defined in `domains`.

pub mod autosave;
pub mod gateway;
pub mod guard;
pub mod manual;
pub mod session;
pub mod slug;
pub mod submit;
pub mod tracker;
pub mod validate;

pub use autosave::{AutosaveConfig, AutosaveHandle, AutosaveScheduler};
pub use gateway::{DraftGateway, PLACEHOLDER_TITLE};
pub use manual::{ManualSaveController, SaveOutcome};
pub use session::{EditorSession, SessionState};
pub use submit::{SubmissionOrchestrator, SubmissionReceipt};
pub use tracker::ChangeTracker;
