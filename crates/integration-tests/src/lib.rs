//! Shared fixtures for the scenario tests.

use async_trait::async_trait;
use domains::{
    ArticlePatch, ArticleRecord, ArticleStore, DraftId, NewArticle, Notice, Notifier, Result,
};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// Captures notices so tests can assert on user-visible messaging.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Store wrapper counting the writes that reach the inner store.
pub struct CountingStore<S> {
    inner: S,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: ArticleStore> ArticleStore for CountingStore<S> {
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(article).await
    }

    async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, patch).await
    }

    async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>> {
        self.inner.get(id).await
    }
}

/// Store wrapper whose reads block until the gate opens, so tests can
/// hold an operation in flight deterministically.
pub struct GatedStore<S> {
    inner: S,
    gate: Semaphore,
}

impl<S> GatedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
        }
    }

    /// Lets `n` pending (or future) reads proceed.
    pub fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ArticleStore> ArticleStore for GatedStore<S> {
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord> {
        self.inner.insert(article).await
    }

    async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()> {
        self.inner.update(id, patch).await
    }

    async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.inner.get(id).await
    }
}

/// Lets spawned pipeline tasks catch up without moving the clock.
pub async fn drain() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

pub fn fake_title() -> String {
    Sentence(2..5).fake()
}

pub fn fake_body() -> String {
    Paragraph(1..3).fake()
}
