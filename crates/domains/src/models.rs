//! # Domain Models
//!
//! The entities of the draft pipeline. Records are identified by UUID;
//! timestamps are owned by the store, never by callers.

use crate::payload::ArticlePayload;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a persisted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(pub Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an authenticated author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an externally-owned taxonomy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A persisted article draft as the store returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: DraftId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: Option<CategoryId>,
    pub media_url: Option<String>,
    /// Generated, never user-edited. Unique across the store.
    pub slug: Option<String>,
    pub payload: ArticlePayload,
    pub status: Status,
    /// Set by the first insert, immutable thereafter.
    pub author_id: Option<UserId>,
    /// At most one record store-wide should be highlighted while
    /// published; enforcement is advisory (see the store adapters).
    pub highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied on first insert. The store assigns id and timestamps,
/// and every new record starts as a non-highlighted `draft`.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: Option<CategoryId>,
    pub media_url: Option<String>,
    pub slug: Option<String>,
    pub payload: ArticlePayload,
    pub author_id: UserId,
}

/// Partial update; `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<CategoryId>,
    pub media_url: Option<String>,
    pub payload: Option<ArticlePayload>,
    pub slug: Option<String>,
    pub status: Option<Status>,
    pub author_id: Option<UserId>,
    pub highlighted: Option<bool>,
}

impl ArticlePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.category_id.is_none()
            && self.media_url.is_none()
            && self.payload.is_none()
            && self.slug.is_none()
            && self.status.is_none()
            && self.author_id.is_none()
            && self.highlighted.is_none()
    }
}

/// One frozen copy of the live form model.
///
/// Ephemeral: feeds save attempts and dirty comparison, never persisted
/// as such.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSnapshot {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: Option<CategoryId>,
    pub media_url: Option<String>,
    pub payload: ArticlePayload,
}

impl FormSnapshot {
    /// The content-bearing fields as a partial update. Status, slug,
    /// ownership and flags are never touched by a plain save.
    pub fn content_patch(&self) -> ArticlePatch {
        ArticlePatch {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            excerpt: Some(self.excerpt.clone()),
            category_id: self.category_id.clone(),
            media_url: self.media_url.clone(),
            payload: Some(self.payload.clone()),
            ..Default::default()
        }
    }

    /// Rebuilds the form from a persisted record (re-edit path).
    pub fn of_record(record: &ArticleRecord) -> Self {
        Self {
            title: record.title.clone(),
            content: record.content.clone(),
            excerpt: record.excerpt.clone(),
            category_id: record.category_id.clone(),
            media_url: record.media_url.clone(),
            payload: record.payload.clone(),
        }
    }
}
