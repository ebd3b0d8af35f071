//! Insert-or-update against the content store.
//!
//! Every save path and the submission path persist through here, so the
//! first-save id capture and the blank-title fallback live in exactly
//! one place.

use crate::session::SessionState;
use crate::slug;
use domains::{
    ArticleStore, DraftError, DraftId, FormSnapshot, IdentityProvider, NewArticle, Result,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Stored in place of a blank title so an autosave never fails merely
/// because the user has not typed one yet.
pub const PLACEHOLDER_TITLE: &str = "Untitled draft";

pub struct DraftGateway {
    store: Arc<dyn ArticleStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl DraftGateway {
    pub fn new(store: Arc<dyn ArticleStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Persists one snapshot: an insert when the session has no record
    /// yet, a partial update of the content fields thereafter.
    ///
    /// Callers must hold the session's writer lock. Repeating an update
    /// with identical data is a no-op in effect, so retries are safe.
    pub async fn persist(&self, state: &SessionState, snapshot: &FormSnapshot) -> Result<DraftId> {
        let author = self
            .identity
            .current_user()
            .await
            .ok_or(DraftError::AuthenticationRequired)?;

        match state.draft_id() {
            Some(id) => {
                self.store.update(id, snapshot.content_patch()).await?;
                debug!(draft_id = %id, "draft updated");
                Ok(id)
            }
            None => {
                let title = if snapshot.title.trim().is_empty() {
                    PLACEHOLDER_TITLE.to_string()
                } else {
                    snapshot.title.clone()
                };
                // The slug derives from what the user actually typed;
                // an empty title gets the generator's own fallback, not
                // a slugified placeholder.
                let slug = slug::generate(&snapshot.title);
                let record = self
                    .store
                    .insert(NewArticle {
                        title,
                        content: snapshot.content.clone(),
                        excerpt: snapshot.excerpt.clone(),
                        category_id: snapshot.category_id.clone(),
                        media_url: snapshot.media_url.clone(),
                        slug: Some(slug),
                        payload: snapshot.payload.clone(),
                        author_id: author,
                    })
                    .await?;
                state.record_draft_id(record.id);
                info!(draft_id = %record.id, slug = record.slug.as_deref(), "draft created");
                Ok(record.id)
            }
        }
    }
}
