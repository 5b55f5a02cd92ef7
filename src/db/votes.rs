use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::media::MediaItemRow;
use crate::error::{AppError, AppResult};
use crate::models::{MediaItem, VoteValue};

/// The vote ledger: one live vote per (room, user, media) triple, plus the
/// aggregate reads that matching and recommendation seeding need.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Records the user's current vote for a media item. An existing vote
    /// for the same triple is replaced in place; the upsert is a single
    /// atomic statement, so concurrent re-casts can never produce duplicate
    /// rows or lost updates.
    async fn cast_vote(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        media_id: Uuid,
        value: VoteValue,
    ) -> AppResult<()>;

    /// Number of distinct users whose current vote for the media item is
    /// "yes".
    async fn count_yes_votes(&self, session_id: Uuid, media_id: Uuid) -> AppResult<i64>;

    /// Distinct titles with at least one current "yes" vote, alphabetical.
    async fn list_liked_titles(&self, session_id: Uuid) -> AppResult<Vec<String>>;

    /// Media items with at least `min_yes_votes` distinct "yes" votes,
    /// ordered by title.
    async fn list_matches(&self, session_id: Uuid, min_yes_votes: i64)
        -> AppResult<Vec<MediaItem>>;
}

#[derive(Clone)]
pub struct PgVoteLedger {
    pool: PgPool,
}

impl PgVoteLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteLedger for PgVoteLedger {
    async fn cast_vote(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        media_id: Uuid,
        value: VoteValue,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_votes (session_id, user_id, media_id, vote)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_id, user_id, media_id)
            DO UPDATE SET vote = EXCLUDED.vote, updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(media_id)
        .bind(value.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_store_write(e, "room, user, or media item"))?;

        Ok(())
    }

    async fn count_yes_votes(&self, session_id: Uuid, media_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM session_votes
            WHERE session_id = $1
              AND media_id = $2
              AND vote = 'yes'
            "#,
        )
        .bind(session_id)
        .bind(media_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_liked_titles(&self, session_id: Uuid) -> AppResult<Vec<String>> {
        let titles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT m.title
            FROM media_items m
            INNER JOIN session_votes sv ON m.id = sv.media_id
            WHERE sv.session_id = $1
              AND sv.vote = 'yes'
            ORDER BY m.title
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(titles)
    }

    async fn list_matches(
        &self,
        session_id: Uuid,
        min_yes_votes: i64,
    ) -> AppResult<Vec<MediaItem>> {
        let rows = sqlx::query_as::<_, MediaItemRow>(
            r#"
            SELECT m.id, m.tmdb_id, m.media_type, m.title, m.metadata, m.created_at, m.updated_at
            FROM media_items m
            INNER JOIN session_votes sv ON m.id = sv.media_id
            WHERE sv.session_id = $1
              AND sv.vote = 'yes'
            GROUP BY m.id, m.tmdb_id, m.media_type, m.title, m.metadata, m.created_at, m.updated_at
            HAVING COUNT(sv.user_id) >= $2
            ORDER BY m.title
            "#,
        )
        .bind(session_id)
        .bind(min_yes_votes)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MediaItem::try_from).collect()
    }
}
