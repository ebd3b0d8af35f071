//! SQLite `ArticleStore` built on sqlx.
//!
//! This module implements the data mapping between the relational model
//! and the `domains` records. Identifiers and timestamps travel as
//! TEXT; the payload column carries the tagged variant as JSON.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    ArticlePatch, ArticlePayload, ArticleRecord, ArticleStore, CategoryId, DraftError, DraftId,
    NewArticle, Result, Status, UserId,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

pub struct SqliteArticleStore {
    pool: SqlitePool,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    excerpt     TEXT NOT NULL DEFAULT '',
    category_id TEXT,
    media_url   TEXT,
    slug        TEXT UNIQUE,
    payload     TEXT NOT NULL,
    status      TEXT NOT NULL,
    author_id   TEXT,
    highlighted INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)
"#;

impl SqliteArticleStore {
    /// Connects and makes sure the schema exists.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new().connect(url).await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

/// Maps an sqlx failure, turning a unique violation on the slug column
/// into the error the pipeline can act on.
fn map_store_err(err: sqlx::Error, slug: Option<&str>) -> DraftError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DraftError::DuplicateSlug(slug.unwrap_or_default().to_string())
        }
        _ => DraftError::Persistence(err.into()),
    }
}

fn row_to_record(row: &SqliteRow) -> Result<ArticleRecord> {
    let id = Uuid::parse_str(&row.get::<String, _>("id"))
        .map_err(|e| DraftError::Persistence(e.into()))?;
    let payload: ArticlePayload = serde_json::from_str(&row.get::<String, _>("payload"))
        .map_err(|e| DraftError::Persistence(e.into()))?;
    let status: Status = row.get::<String, _>("status").parse()?;

    Ok(ArticleRecord {
        id: DraftId(id),
        title: row.get("title"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        category_id: row.get::<Option<String>, _>("category_id").map(CategoryId),
        media_url: row.get("media_url"),
        slug: row.get("slug"),
        payload,
        status,
        author_id: row.get::<Option<String>, _>("author_id").map(UserId),
        highlighted: row.get("highlighted"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord> {
        let id = DraftId::new();
        let now = Utc::now();
        let payload = serde_json::to_string(&article.payload)
            .map_err(|e| DraftError::Persistence(e.into()))?;

        sqlx::query(
            "INSERT INTO articles \
             (id, title, content, excerpt, category_id, media_url, slug, payload, status, author_id, highlighted, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(id.to_string())
        .bind(article.title.as_str())
        .bind(article.content.as_str())
        .bind(article.excerpt.as_str())
        .bind(article.category_id.as_ref().map(|c| c.0.as_str()))
        .bind(article.media_url.as_deref())
        .bind(article.slug.as_deref())
        .bind(payload.as_str())
        .bind(Status::Draft.as_str())
        .bind(article.author_id.0.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_store_err(e, article.slug.as_deref()))?;

        debug!(draft_id = %id, "inserted draft");
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
    }

    async fn update(&self, id: DraftId, patch: ArticlePatch) -> Result<()> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE articles SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(title) = &patch.title {
            query.push(", title = ").push_bind(title.as_str());
        }
        if let Some(content) = &patch.content {
            query.push(", content = ").push_bind(content.as_str());
        }
        if let Some(excerpt) = &patch.excerpt {
            query.push(", excerpt = ").push_bind(excerpt.as_str());
        }
        if let Some(category_id) = &patch.category_id {
            query.push(", category_id = ").push_bind(category_id.0.as_str());
        }
        if let Some(media_url) = &patch.media_url {
            query.push(", media_url = ").push_bind(media_url.as_str());
        }
        if let Some(payload) = &patch.payload {
            let payload =
                serde_json::to_string(payload).map_err(|e| DraftError::Persistence(e.into()))?;
            query.push(", payload = ").push_bind(payload);
        }
        if let Some(slug) = &patch.slug {
            query.push(", slug = ").push_bind(slug.as_str());
        }
        if let Some(status) = patch.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        if let Some(author_id) = &patch.author_id {
            // Write-once: the column only changes while it is NULL.
            query
                .push(", author_id = COALESCE(author_id, ")
                .push_bind(author_id.0.as_str())
                .push(")");
        }
        if let Some(highlighted) = patch.highlighted {
            query.push(", highlighted = ").push_bind(highlighted);
        }

        query.push(" WHERE id = ").push_bind(id.to_string());

        let outcome = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_store_err(e, patch.slug.as_deref()))?;
        if outcome.rows_affected() == 0 {
            return Err(DraftError::NotFound(id));
        }
        Ok(())
    }

    async fn get(&self, id: DraftId) -> Result<Option<ArticleRecord>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_store_err(e, None))?;
        row.as_ref().map(row_to_record).transpose()
    }
}
