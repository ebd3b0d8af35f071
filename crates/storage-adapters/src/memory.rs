//! In-memory `ArticleStore`.
//!
//! Mirrors the semantics the remote store guarantees: partial updates,
//! slug uniqueness surfaced as a distinguishable error, timestamps
//! owned by the store, last write wins.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    ArticlePatch, ArticleRecord, ArticleStore, DraftError, DraftId, NewArticle, Result, Status,
};
use tracing::{debug, warn};

#[derive(Default)]
pub struct MemoryArticleStore {
    records: DashMap<DraftId, ArticleRecord>,
    /// slug -> owning record, backing the unique constraint.
    slugs: DashMap<String, DraftId>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Claims `slug` for `id`, failing when another record holds it.
    fn claim_slug(&self, slug: &str, id: DraftId) -> Result<()> {
        match self.slugs.entry(slug.to_string()) {
            Entry::Occupied(held) if *held.get() != id => {
                Err(DraftError::DuplicateSlug(slug.to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(open) => {
                open.insert(id);
                Ok(())
            }
        }
    }

    fn highlighted_published(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.highlighted && r.status == Status::Published)
            .count()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord> {
        let id = DraftId::new();
        if let Some(slug) = &article.slug {
            self.claim_slug(slug, id)?;
        }
        let now = Utc::now();
        let record = ArticleRecord {
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
        };
        self.records.insert(id, record.clone());
        debug!(draft_id = %id, "inserted draft");
        Ok(record)
    }

    async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()> {
        // Claim the slug before touching the record so a losing writer
        // fails without a partial write.
        if let Some(slug) = &patch.slug {
            self.claim_slug(slug, id)?;
        }

        {
            let mut record = self.records.get_mut(&id).ok_or(DraftError::NotFound(id))?;
            if let Some(title) = patch.title {
                record.title = title;
            }
            if let Some(content) = patch.content {
                record.content = content;
            }
            if let Some(excerpt) = patch.excerpt {
                record.excerpt = excerpt;
            }
            if let Some(category_id) = patch.category_id {
                record.category_id = Some(category_id);
            }
            if let Some(media_url) = patch.media_url {
                record.media_url = Some(media_url);
            }
            if let Some(payload) = patch.payload {
                record.payload = payload;
            }
            if let Some(slug) = patch.slug {
                record.slug = Some(slug);
            }
            if let Some(status) = patch.status {
                record.status = status;
            }
            if let Some(author_id) = patch.author_id {
                // Ownership is write-once.
                match &record.author_id {
                    None => record.author_id = Some(author_id),
                    Some(existing) if *existing == author_id => {}
                    Some(existing) => {
                        warn!(draft_id = %id, owner = %existing, "author is immutable; ignoring reassignment");
                    }
                }
            }
            if let Some(highlighted) = patch.highlighted {
                record.highlighted = highlighted;
            }
            record.updated_at = Utc::now();
        }

        // Advisory only: the product expects at most one highlighted
        // article on the front page at a time.
        if self.highlighted_published() > 1 {
            warn!(draft_id = %id, "more than one highlighted published article in the store");
        }
        Ok(())
    }

    async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>> {
        Ok(self.records.get(&id).map(|record| record.value().clone()))
    }
}
