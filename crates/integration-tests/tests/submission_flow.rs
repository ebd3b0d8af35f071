//! End-to-end submission scenarios: ownership, validation, slug
//! stability, idempotent resubmission and the duplicate-submit guard.

use auth_adapters::SessionIdentity;
use domains::{
    ArticlePatch, ArticlePayload, ArticleStore, CategoryId, DraftError, NewArticle, Status, UserId,
};
use integration_tests::{drain, fake_title, CountingStore, GatedStore, RecordingNotifier};
use services::{AutosaveConfig, EditorSession};
use std::sync::Arc;
use storage_adapters::MemoryArticleStore;

fn config() -> AutosaveConfig {
    AutosaveConfig::default()
}

fn author(user: &str) -> Arc<SessionIdentity> {
    Arc::new(SessionIdentity::signed_in(UserId::from(user)))
}

/// A store-ready article that passes every submission check.
fn complete_article(owner: &str, slug: &str) -> NewArticle {
    NewArticle {
        title: fake_title(),
        content: "A body long enough to publish.".into(),
        excerpt: "teaser".into(),
        category_id: Some(CategoryId::from("cat-1")),
        media_url: Some("https://cdn.example/cover.jpg".into()),
        slug: Some(slug.to_string()),
        payload: ArticlePayload::Standard,
        author_id: UserId::from(owner),
    }
}

#[tokio::test]
async fn submit_transitions_to_pending_without_regenerating_the_slug() {
    let store = Arc::new(MemoryArticleStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let session = EditorSession::new(store.clone(), author("author-1"), notifier.clone(), config());

    session.edit(|form| {
        form.title = "My First Article".into();
        form.content = "Hello world".into();
        form.category_id = Some(CategoryId::from("cat-1"));
        form.media_url = Some("https://cdn.example/cover.jpg".into());
    });
    session.save_now().await.unwrap();

    let id = session.draft_id().unwrap();
    let saved_slug = store.get(id).await.unwrap().unwrap().slug;
    assert!(saved_slug.is_some());

    let receipt = session.submit().await.unwrap();
    assert_eq!(receipt.draft_id, id);
    assert!(receipt.transitioned);

    let record = store.get(id).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Pending);
    assert_eq!(record.slug, saved_slug, "submission must not regenerate a present slug");
    assert!(notifier.titles().contains(&"Submitted".to_string()));
}

#[tokio::test]
async fn video_without_url_fails_validation_and_stays_draft() {
    let store = Arc::new(MemoryArticleStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let session = EditorSession::new(store.clone(), author("author-1"), notifier, config());

    session.edit(|form| {
        form.title = "Clip of the week".into();
        form.content = "Watch this.".into();
        form.category_id = Some(CategoryId::from("cat-video"));
        form.media_url = Some("https://cdn.example/thumb.jpg".into());
        form.payload = ArticlePayload::Video {
            video_url: String::new(),
        };
    });
    session.save_now().await.unwrap();

    let err = session.submit().await.unwrap_err();
    let DraftError::ValidationFailed(fields) = err else {
        panic!("expected ValidationFailed, got {err:?}");
    };
    assert_eq!(fields, vec!["videoUrl"]);

    let record = store.get(session.draft_id().unwrap()).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Draft, "nothing may transition on failure");
}

#[tokio::test]
async fn foreign_draft_is_permission_denied() {
    let store = Arc::new(MemoryArticleStore::new());
    let record = store
        .insert(complete_article("author-a", "their-article-1"))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let session =
        EditorSession::resume(store.clone(), author("author-b"), notifier, config(), &record);

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, DraftError::PermissionDenied));

    let unchanged = store.get(record.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, Status::Draft);
    assert_eq!(unchanged.author_id, Some(UserId::from("author-a")));
}

#[tokio::test]
async fn pending_draft_resubmits_without_a_second_status_write() {
    let store = Arc::new(CountingStore::new(MemoryArticleStore::new()));
    let record = store
        .inner()
        .insert(complete_article("author-1", "already-pending-1"))
        .await
        .unwrap();
    store
        .inner()
        .update(
            record.id,
            ArticlePatch {
                status: Some(Status::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let record = store.inner().get(record.id).await.unwrap().unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let session =
        EditorSession::resume(store.clone(), author("author-1"), notifier, config(), &record);

    let receipt = session.submit().await.unwrap();
    assert!(!receipt.transitioned);
    assert_eq!(store.updates(), 0, "idempotent resubmission writes nothing");
}

#[tokio::test]
async fn signed_out_session_cannot_submit() {
    let store = Arc::new(MemoryArticleStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let identity = Arc::new(SessionIdentity::new());
    let session = EditorSession::new(store, identity, notifier, config());

    session.edit(|form| form.content = "draft typed while logged out".into());
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, DraftError::AuthenticationRequired));
}

#[tokio::test]
async fn rapid_double_submit_transitions_exactly_once() {
    let store = Arc::new(GatedStore::new(CountingStore::new(MemoryArticleStore::new())));
    let record = store
        .inner()
        .inner()
        .insert(complete_article("author-1", "double-click-1"))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let session = Arc::new(EditorSession::resume(
        store.clone(),
        author("author-1"),
        notifier.clone(),
        config(),
        &record,
    ));

    // First submit parks on the gated read with the guard held.
    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit().await }
    });
    drain().await;

    // The double click: rejected before any store traffic.
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, DraftError::AlreadyInProgress));

    store.open(1);
    let receipt = first.await.unwrap().unwrap();
    assert!(receipt.transitioned);
    assert_eq!(store.inner().updates(), 1, "exactly one status write");

    let record = store.inner().inner().get(record.id).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Pending);
    assert_eq!(notifier.titles(), vec!["Submitted"], "the no-op stays silent");
}

#[tokio::test]
async fn ownership_check_runs_against_the_fetched_record() {
    let store = Arc::new(MemoryArticleStore::new());
    // Records migrated from an older system may predate ownership.
    let record = store
        .insert(complete_article("author-1", "legacy-import-1"))
        .await
        .unwrap();
    // Strip the author the adapter attached, simulating the legacy row.
    let legacy = domains::ArticleRecord {
        author_id: None,
        ..record
    };

    let notifier = Arc::new(RecordingNotifier::new());
    let session =
        EditorSession::resume(store.clone(), author("author-2"), notifier, config(), &legacy);

    // The store still holds author-1, so the ownership check runs
    // against the fetched record, not the session's stale copy.
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, DraftError::PermissionDenied));
}
