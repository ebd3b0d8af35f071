//! Submission into the review lifecycle.
//!
//! The highest-stakes operation in the pipeline: it both persists and
//! changes status. Each step fails the whole call; nothing is
//! transitioned on a partial failure.

use crate::gateway::DraftGateway;
use crate::session::SessionState;
use crate::slug;
use crate::validate;
use domains::{
    ArticlePatch, ArticleRecord, ArticleStore, DraftError, FormSnapshot, IdentityProvider, Notice,
    Notifier, Result, Status,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Proof that a draft entered (or already sat in) the review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub draft_id: domains::DraftId,
    /// False when the record was already pending and no status write
    /// was issued (idempotent resubmission).
    pub transitioned: bool,
}

pub struct SubmissionOrchestrator {
    state: Arc<SessionState>,
    gateway: Arc<DraftGateway>,
    store: Arc<dyn ArticleStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionOrchestrator {
    pub fn new(
        state: Arc<SessionState>,
        gateway: Arc<DraftGateway>,
        store: Arc<dyn ArticleStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state,
            gateway,
            store,
            identity,
            notifier,
        }
    }

    /// Validates, finalizes (owner, slug) and transitions the draft to
    /// `pending`.
    ///
    /// A second call while one is outstanding resolves to
    /// `AlreadyInProgress` without touching the store; callers absorb
    /// that silently, so double-clicks never enqueue a duplicate review.
    pub async fn submit(&self, snapshot: &FormSnapshot) -> Result<SubmissionReceipt> {
        let Some(_permit) = self.state.submitting.try_acquire() else {
            debug!("submission rejected: one already outstanding");
            return Err(DraftError::AlreadyInProgress);
        };

        let result = self.run(snapshot).await;
        match &result {
            Ok(receipt) => {
                info!(draft_id = %receipt.draft_id, transitioned = receipt.transitioned, "draft submitted for review");
                self.notifier.notify(Notice::info(
                    "Submitted",
                    "Your article was sent for review.",
                ));
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.notifier
                    .notify(Notice::error("Submission failed", err.to_string()));
            }
        }
        result
    }

    async fn run(&self, snapshot: &FormSnapshot) -> Result<SubmissionReceipt> {
        // 1. A resolved identity gates everything else.
        let caller = self
            .identity
            .current_user()
            .await
            .ok_or(DraftError::AuthenticationRequired)?;

        // Saves are excluded for the whole write section.
        let _writer = self.state.writer.lock().await;

        // 2. A never-saved draft is persisted first; then the current
        //    record is read back, which protects against a draft edited
        //    or reassigned from elsewhere.
        let id = match self.state.draft_id() {
            Some(id) => id,
            None => self.gateway.persist(&self.state, snapshot).await?,
        };
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(DraftError::NotFound(id))?;

        // 3. / 4. Ownership: a foreign owner stops the submission; a
        //    missing one is claimed by the caller.
        let record = match &record.author_id {
            Some(owner) if *owner != caller => {
                debug!(draft_id = %id, owner = %owner, caller = %caller, "ownership mismatch");
                return Err(DraftError::PermissionDenied);
            }
            Some(_) => record,
            None => {
                self.store
                    .update(
                        id,
                        ArticlePatch {
                            author_id: Some(caller.clone()),
                            ..Default::default()
                        },
                    )
                    .await?;
                ArticleRecord {
                    author_id: Some(caller.clone()),
                    ..record
                }
            }
        };

        // 5. A record without a slug gets a fresh one; a uniqueness
        //    violation fails the submission rather than looping.
        let record = match record.slug {
            Some(_) => record,
            None => {
                let new_slug = slug::generate(&record.title);
                self.store
                    .update(
                        id,
                        ArticlePatch {
                            slug: Some(new_slug.clone()),
                            ..Default::default()
                        },
                    )
                    .await?;
                ArticleRecord {
                    slug: Some(new_slug),
                    ..record
                }
            }
        };

        // 6. Field completeness for the declared variant.
        validate::validate_for_submission(&record)?;

        // 7. Idempotent resubmission: already pending short-circuits
        //    without a second status write.
        if record.status == Status::Pending {
            debug!(draft_id = %id, "already pending; skipping status write");
            return Ok(SubmissionReceipt {
                draft_id: id,
                transitioned: false,
            });
        }

        // 8. The lifecycle authorizes the edge; anything but a draft
        //    fails closed here.
        let next = record.status.checked_transition(Status::Pending)?;
        self.store
            .update(
                id,
                ArticlePatch {
                    status: Some(next),
                    ..Default::default()
                },
            )
            .await?;

        Ok(SubmissionReceipt {
            draft_id: id,
            transitioned: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        ArticlePayload, CategoryId, DraftId, MockArticleStore, MockIdentityProvider, MockNotifier,
        UserId,
    };

    fn stored(id: DraftId, owner: Option<&str>, status: Status, slug: Option<&str>) -> ArticleRecord {
        let now = chrono::Utc::now();
        ArticleRecord {
            id,
            title: "My First Article".into(),
            content: "Hello world".into(),
            excerpt: "hello".into(),
            category_id: Some(CategoryId::from("cat-1")),
            media_url: Some("https://cdn.example/cover.jpg".into()),
            slug: slug.map(str::to_string),
            payload: ArticlePayload::Standard,
            status,
            author_id: owner.map(UserId::from),
            highlighted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn signed_in(user: &str) -> Arc<MockIdentityProvider> {
        let mut identity = MockIdentityProvider::new();
        let user = UserId::from(user);
        identity
            .expect_current_user()
            .returning(move || Some(user.clone()));
        Arc::new(identity)
    }

    fn quiet_notifier() -> Arc<MockNotifier> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());
        Arc::new(notifier)
    }

    fn orchestrator(
        store: MockArticleStore,
        identity: Arc<MockIdentityProvider>,
        id: Option<DraftId>,
    ) -> SubmissionOrchestrator {
        let state = Arc::new(SessionState::new());
        if let Some(id) = id {
            state.record_draft_id(id);
        }
        let store = Arc::new(store);
        let gateway = Arc::new(DraftGateway::new(store.clone(), identity.clone()));
        SubmissionOrchestrator::new(state, gateway, store, identity, quiet_notifier())
    }

    fn snapshot() -> FormSnapshot {
        FormSnapshot {
            title: "My First Article".into(),
            content: "Hello world".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn transitions_a_complete_draft_to_pending() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Draft, Some("s-1")))));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| patch.status == Some(Status::Pending) && patch.slug.is_none())
            .returning(|_, _| Ok(()));

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        let receipt = orchestrator.submit(&snapshot()).await.unwrap();
        assert_eq!(receipt.draft_id, id);
        assert!(receipt.transitioned);
    }

    #[tokio::test]
    async fn requires_identity_before_anything_else() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().returning(|| None);
        let mut store = MockArticleStore::new();
        store.expect_get().times(0);
        store.expect_update().times(0);

        let orchestrator = orchestrator(store, Arc::new(identity), Some(DraftId::new()));
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        assert!(matches!(err, DraftError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn foreign_owner_is_permission_denied_with_no_writes() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-a"), Status::Draft, Some("s-1")))));
        store.expect_update().times(0);

        let orchestrator = orchestrator(store, signed_in("author-b"), Some(id));
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        assert!(matches!(err, DraftError::PermissionDenied));
    }

    #[tokio::test]
    async fn unowned_record_is_claimed_by_the_caller() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, None, Status::Draft, Some("s-1")))));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| patch.author_id == Some(UserId::from("author-1")))
            .returning(|_, _| Ok(()));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| patch.status == Some(Status::Pending))
            .returning(|_, _| Ok(()));

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        orchestrator.submit(&snapshot()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_slug_is_generated_and_persisted() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Draft, None))));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| {
                patch
                    .slug
                    .as_deref()
                    .is_some_and(|s| s.starts_with("my-first-article-"))
            })
            .returning(|_, _| Ok(()));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| patch.status == Some(Status::Pending))
            .returning(|_, _| Ok(()));

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        orchestrator.submit(&snapshot()).await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_slug_fails_the_submission_outright() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Draft, None))));
        store
            .expect_update()
            .times(1)
            .returning(|_, patch| Err(DraftError::DuplicateSlug(patch.slug.unwrap_or_default())));

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        assert!(matches!(err, DraftError::DuplicateSlug(_)));
    }

    #[tokio::test]
    async fn incomplete_video_article_reports_the_field() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store.expect_get().returning(move |_| {
            Ok(Some(ArticleRecord {
                payload: ArticlePayload::Video {
                    video_url: String::new(),
                },
                ..stored(id, Some("author-1"), Status::Draft, Some("s-1"))
            }))
        });
        store.expect_update().times(0);

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        let DraftError::ValidationFailed(fields) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        assert_eq!(fields, vec!["videoUrl"]);
    }

    #[tokio::test]
    async fn pending_record_resubmits_idempotently() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Pending, Some("s-1")))));
        store.expect_update().times(0);

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        let receipt = orchestrator.submit(&snapshot()).await.unwrap();
        assert!(!receipt.transitioned);
    }

    #[tokio::test]
    async fn published_record_fails_closed() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Published, Some("s-1")))));
        store.expect_update().times(0);

        let orchestrator = orchestrator(store, signed_in("author-1"), Some(id));
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        assert!(matches!(
            err,
            DraftError::IllegalTransition {
                from: Status::Published,
                to: Status::Pending,
            }
        ));
    }

    #[tokio::test]
    async fn concurrent_submit_is_rejected_before_store_traffic() {
        let store = MockArticleStore::new();
        let orchestrator = orchestrator(store, signed_in("author-1"), Some(DraftId::new()));

        let _held = orchestrator.state.submitting.try_acquire().unwrap();
        let err = orchestrator.submit(&snapshot()).await.unwrap_err();
        assert!(matches!(err, DraftError::AlreadyInProgress));
    }

    #[tokio::test]
    async fn never_saved_draft_is_persisted_then_submitted() {
        let id = DraftId::new();
        let mut store = MockArticleStore::new();
        store.expect_insert().times(1).returning(move |article| {
            let now = chrono::Utc::now();
            Ok(ArticleRecord {
                id,
                title: article.title,
                content: article.content,
                excerpt: article.excerpt,
                category_id: article.category_id,
                media_url: article.media_url,
                slug: article.slug,
                payload: article.payload,
                status: Status::Draft,
                author_id: Some(article.author_id),
                highlighted: false,
                created_at: now,
                updated_at: now,
            })
        });
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored(id, Some("author-1"), Status::Draft, Some("s-1")))));
        store
            .expect_update()
            .times(1)
            .withf(|_, patch| patch.status == Some(Status::Pending))
            .returning(|_, _| Ok(()));

        let orchestrator = orchestrator(store, signed_in("author-1"), None);
        let receipt = orchestrator.submit(&snapshot()).await.unwrap();
        assert_eq!(receipt.draft_id, id);
        assert!(receipt.transitioned);
    }
}
