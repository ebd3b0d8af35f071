//! # Ports
//!
//! External collaborators of the pipeline. Any adapter must implement
//! these traits to be wired into an editor session.

use crate::error::Result;
use crate::models::{ArticlePatch, ArticleRecord, DraftId, NewArticle, UserId};
use async_trait::async_trait;

/// Remote content store contract over `articles`-shaped records.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Inserts a new record; the store assigns id and timestamps.
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord>;

    /// Partially updates an existing record; only supplied fields
    /// change. A unique-constraint violation on `slug` must surface as
    /// `DraftError::DuplicateSlug`, never be swallowed.
    async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()>;

    /// Reads the current record by id.
    async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>>;
}

/// Identity resolution contract. Credential acquisition happens
/// elsewhere; the pipeline only reads the resolved user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently authenticated author, if any.
    async fn current_user(&self) -> Option<UserId>;
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A fire-and-forget user notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Error,
        }
    }
}

/// Notification sink contract. Delivery is best-effort; the pipeline
/// never depends on it succeeding.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[cfg(any(test, feature = "testing"))]
mod mocks {
    use super::*;
    use mockall::mock;

    mock! {
        pub ArticleStore {}

        #[async_trait]
        impl ArticleStore for ArticleStore {
            async fn insert(&self, article: NewArticle) -> Result<ArticleRecord>;
            async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()>;
            async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>>;
        }
    }

    mock! {
        pub IdentityProvider {}

        #[async_trait]
        impl IdentityProvider for IdentityProvider {
            async fn current_user(&self) -> Option<UserId>;
        }
    }

    mock! {
        pub Notifier {}

        impl Notifier for Notifier {
            fn notify(&self, notice: Notice);
        }
    }
}

#[cfg(any(test, feature = "testing"))]
pub use mocks::{MockArticleStore, MockIdentityProvider, MockNotifier};
