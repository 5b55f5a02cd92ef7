use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{InvitePreference, Profile};

const SEARCH_LIMIT: i64 = 20;

/// User profiles and the follow graph backing the invitation policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>>;

    /// Creates or updates the caller's profile.
    async fn upsert_profile(
        &self,
        user_id: Uuid,
        username: &str,
        invite_preference: InvitePreference,
    ) -> AppResult<()>;

    /// Creates a follow edge; following someone twice is a no-op.
    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()>;

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()>;

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<bool>;

    async fn list_following(&self, user_id: Uuid) -> AppResult<Vec<Profile>>;

    /// Case-insensitive username search.
    async fn search_users(&self, query: &str) -> AppResult<Vec<Profile>>;
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    username: Option<String>,
    invite_preference: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let invite_preference = InvitePreference::parse(&row.invite_preference).ok_or_else(|| {
            AppError::Internal(format!(
                "unexpected invite preference in store: {}",
                row.invite_preference
            ))
        })?;

        Ok(Profile {
            user_id: row.user_id,
            username: row.username,
            invite_preference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, username, invite_preference, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        username: &str,
        invite_preference: InvitePreference,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, username, invite_preference)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                username = EXCLUDED.username,
                invite_preference = EXCLUDED.invite_preference,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(invite_preference.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_follows (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_store_write(e, "user profile"))?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM user_follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_follows
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_following(&self, user_id: Uuid) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT p.user_id, p.username, p.invite_preference, p.created_at, p.updated_at
            FROM profiles p
            INNER JOIN user_follows uf ON p.user_id = uf.following_id
            WHERE uf.follower_id = $1
            ORDER BY p.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn search_users(&self, query: &str) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, username, invite_preference, created_at, updated_at
            FROM profiles
            WHERE username ILIKE $1
            ORDER BY username
            LIMIT $2
            "#,
        )
        .bind(format!("%{}%", query))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }
}
