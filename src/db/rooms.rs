use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{RoomStatus, WatchRoom};

/// Rooms and their participants. Lifecycle enforcement for voting happens in
/// the handler layer; this store only records state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Creates a room with the creator and any initial members as
    /// participants, in one transaction.
    async fn create_room(
        &self,
        creator_id: Uuid,
        name: Option<String>,
        is_public: bool,
        initial_members: Vec<Uuid>,
    ) -> AppResult<WatchRoom>;

    async fn get_room(&self, room_id: Uuid) -> AppResult<Option<WatchRoom>>;

    /// Rooms the user participates in, most recent first.
    async fn rooms_for_user(&self, user_id: Uuid) -> AppResult<Vec<WatchRoom>>;

    /// Adds a participant; re-adding an existing participant is a no-op.
    async fn add_participant(&self, room_id: Uuid, user_id: Uuid) -> AppResult<()>;

    async fn is_participant(&self, room_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Marks a room completed. Idempotent: completing an already-completed
    /// room keeps its original completion time. Returns `None` for an
    /// unknown room.
    async fn complete_room(&self, room_id: Uuid) -> AppResult<Option<WatchRoom>>;
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    creator_id: Uuid,
    name: Option<String>,
    is_public: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<RoomRow> for WatchRoom {
    type Error = AppError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let status = RoomStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unexpected room status in store: {}", row.status))
        })?;

        Ok(WatchRoom {
            id: row.id,
            creator_id: row.creator_id,
            name: row.name,
            is_public: row.is_public,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

const ROOM_COLUMNS: &str = "id, creator_id, name, is_public, status, created_at, updated_at, completed_at";

#[derive(Clone)]
pub struct PgRoomStore {
    pool: PgPool,
}

impl PgRoomStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn create_room(
        &self,
        creator_id: Uuid,
        name: Option<String>,
        is_public: bool,
        initial_members: Vec<Uuid>,
    ) -> AppResult<WatchRoom> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RoomRow>(&format!(
            r#"
            INSERT INTO watch_rooms (creator_id, name, is_public, status)
            VALUES ($1, $2, $3, 'active')
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(creator_id)
        .bind(&name)
        .bind(is_public)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_store_write(e, "creator profile"))?;

        let mut members = vec![creator_id];
        members.extend(initial_members.into_iter().filter(|id| *id != creator_id));

        for member_id in members {
            sqlx::query(
                r#"
                INSERT INTO room_participants (room_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (room_id, user_id) DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(member_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_store_write(e, "member profile"))?;
        }

        tx.commit().await?;

        row.try_into()
    }

    async fn get_room(&self, room_id: Uuid) -> AppResult<Option<WatchRoom>> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM watch_rooms WHERE id = $1"
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WatchRoom::try_from).transpose()
    }

    async fn rooms_for_user(&self, user_id: Uuid) -> AppResult<Vec<WatchRoom>> {
        let rows = sqlx::query_as::<_, RoomRow>(&format!(
            r#"
            SELECT DISTINCT r.id, r.creator_id, r.name, r.is_public, r.status,
                            r.created_at, r.updated_at, r.completed_at
            FROM watch_rooms r
            INNER JOIN room_participants rp ON r.id = rp.room_id
            WHERE rp.user_id = $1
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WatchRoom::try_from).collect()
    }

    async fn add_participant(&self, room_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO room_participants (room_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (room_id, user_id) DO NOTHING
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_store_write(e, "room or user profile"))?;

        Ok(())
    }

    async fn is_participant(&self, room_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM room_participants
                WHERE room_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn complete_room(&self, room_id: Uuid) -> AppResult<Option<WatchRoom>> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            r#"
            UPDATE watch_rooms
            SET status = 'completed',
                completed_at = COALESCE(completed_at, NOW()),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WatchRoom::try_from).transpose()
    }
}
