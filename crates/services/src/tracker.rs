//! Dirty detection against the last persisted snapshot.

use domains::FormSnapshot;
use std::sync::Mutex;

/// Computes whether the in-memory form model has diverged from the last
/// value known to be persisted.
#[derive(Default)]
pub struct ChangeTracker {
    inner: Mutex<Baseline>,
}

#[derive(Default)]
struct Baseline {
    last_saved: Option<FormSnapshot>,
    last_save_failed: bool,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True whenever the snapshot differs from the persisted baseline.
    ///
    /// A never-saved draft counts as dirty as soon as it has content,
    /// so brand-new drafts are eligible for autosave before any record
    /// exists.
    pub fn is_dirty(&self, current: &FormSnapshot) -> bool {
        let inner = self.inner.lock().expect("tracker mutex poisoned");
        match &inner.last_saved {
            Some(baseline) => baseline != current,
            None => !current.content.is_empty(),
        }
    }

    /// True when the previous attempt failed and no successful save has
    /// superseded it. A manual save retries even on a clean diff then.
    pub fn last_save_failed(&self) -> bool {
        self.inner
            .lock()
            .expect("tracker mutex poisoned")
            .last_save_failed
    }

    /// Rebaselines after a successful persistence.
    pub fn mark_saved(&self, snapshot: &FormSnapshot) {
        let mut inner = self.inner.lock().expect("tracker mutex poisoned");
        inner.last_saved = Some(snapshot.clone());
        inner.last_save_failed = false;
    }

    /// Records a failed attempt; the draft stays dirty so a later tick
    /// or manual save retries.
    pub fn mark_failed(&self) {
        self.inner
            .lock()
            .expect("tracker mutex poisoned")
            .last_save_failed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(content: &str) -> FormSnapshot {
        FormSnapshot {
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn fresh_form_with_content_is_dirty() {
        let tracker = ChangeTracker::new();
        assert!(!tracker.is_dirty(&FormSnapshot::default()));
        assert!(tracker.is_dirty(&typed("Hello world")));
    }

    #[test]
    fn saved_snapshot_is_clean_until_edited() {
        let tracker = ChangeTracker::new();
        let snapshot = typed("Hello world");
        tracker.mark_saved(&snapshot);
        assert!(!tracker.is_dirty(&snapshot));

        let edited = typed("Hello world, again");
        assert!(tracker.is_dirty(&edited));
    }

    #[test]
    fn title_changes_count_as_dirty_once_baselined() {
        let tracker = ChangeTracker::new();
        let mut snapshot = typed("body");
        tracker.mark_saved(&snapshot);
        snapshot.title = "New headline".into();
        assert!(tracker.is_dirty(&snapshot));
    }

    #[test]
    fn failure_flag_is_sticky_until_next_success() {
        let tracker = ChangeTracker::new();
        let snapshot = typed("body");
        tracker.mark_failed();
        assert!(tracker.last_save_failed());
        tracker.mark_saved(&snapshot);
        assert!(!tracker.last_save_failed());
    }
}
