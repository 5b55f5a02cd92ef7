use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{MediaItem, MediaKind, TmdbMovie};

/// Local cache of external media records, deduplicated by (tmdb_id, kind).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaCache: Send + Sync {
    /// Inserts or refreshes the cached record for a movie and returns the
    /// stored row, surrogate id included. Re-caching the same TMDB id
    /// overwrites title and metadata; it never creates a duplicate.
    async fn upsert_movie(&self, movie: &TmdbMovie) -> AppResult<MediaItem>;

    /// Looks up a cached record by its external identity.
    async fn get_by_tmdb_id(&self, tmdb_id: i64, kind: MediaKind) -> AppResult<Option<MediaItem>>;
}

/// Raw row shape shared with the vote ledger's match query.
#[derive(sqlx::FromRow)]
pub(crate) struct MediaItemRow {
    pub id: Uuid,
    pub tmdb_id: i64,
    pub media_type: String,
    pub title: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MediaItemRow> for MediaItem {
    type Error = AppError;

    fn try_from(row: MediaItemRow) -> Result<Self, Self::Error> {
        let media_type = MediaKind::parse(&row.media_type).ok_or_else(|| {
            AppError::Internal(format!("unexpected media kind in store: {}", row.media_type))
        })?;

        Ok(MediaItem {
            id: row.id,
            tmdb_id: row.tmdb_id,
            media_type,
            title: row.title,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgMediaCache {
    pool: PgPool,
}

impl PgMediaCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaCache for PgMediaCache {
    async fn upsert_movie(&self, movie: &TmdbMovie) -> AppResult<MediaItem> {
        // Single round trip: the RETURNING clause hands back the live row so
        // callers never have to re-read after the write.
        let row = sqlx::query_as::<_, MediaItemRow>(
            r#"
            INSERT INTO media_items (tmdb_id, media_type, title, metadata)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tmdb_id, media_type) DO UPDATE
            SET title = EXCLUDED.title,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            RETURNING id, tmdb_id, media_type, title, metadata, created_at, updated_at
            "#,
        )
        .bind(movie.id)
        .bind(MediaKind::Movie.as_str())
        .bind(&movie.title)
        .bind(movie.metadata_blob())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_by_tmdb_id(&self, tmdb_id: i64, kind: MediaKind) -> AppResult<Option<MediaItem>> {
        let row = sqlx::query_as::<_, MediaItemRow>(
            r#"
            SELECT id, tmdb_id, media_type, title, metadata, created_at, updated_at
            FROM media_items
            WHERE tmdb_id = $1 AND media_type = $2
            "#,
        )
        .bind(tmdb_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MediaItem::try_from).transpose()
    }
}
