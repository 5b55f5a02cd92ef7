use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{InvitePreference, WatchRoom};

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub user_id: Uuid,
}

/// POST /api/rooms
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<WatchRoom>)> {
    let room = state
        .rooms
        .create_room(user_id, body.name, body.is_public, body.member_ids)
        .await?;

    tracing::info!(room_id = %room.id, creator_id = %user_id, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/rooms
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<Vec<WatchRoom>>> {
    let rooms = state.rooms.rooms_for_user(user_id).await?;
    Ok(Json(rooms))
}

/// GET /api/rooms/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<WatchRoom>> {
    let room = fetch_room(&state, room_id).await?;

    if !room.is_public && !state.rooms.is_participant(room_id, user_id).await? {
        return Err(AppError::Forbidden(
            "you are not a participant of this room".to_string(),
        ));
    }

    Ok(Json(room))
}

/// POST /api/rooms/:id/invite
///
/// Adds another user to the room, subject to that user's invite preference:
/// "anyone" always succeeds, "following" requires the invitee to follow the
/// inviter, "none" always fails.
pub async fn invite(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
    Json(body): Json<InviteRequest>,
) -> AppResult<StatusCode> {
    let room = fetch_room(&state, room_id).await?;

    if !room.status.is_active() {
        return Err(AppError::InvalidInput(
            "room is no longer active".to_string(),
        ));
    }
    if !state.rooms.is_participant(room_id, user_id).await? {
        return Err(AppError::Forbidden(
            "only participants can invite others".to_string(),
        ));
    }

    // Missing profiles get the default preference.
    let preference = state
        .profiles
        .get_profile(body.user_id)
        .await?
        .map(|p| p.invite_preference)
        .unwrap_or(InvitePreference::Anyone);

    match preference {
        InvitePreference::Anyone => {}
        InvitePreference::Following => {
            if !state.profiles.is_following(body.user_id, user_id).await? {
                return Err(AppError::Forbidden(
                    "this user only accepts invites from people they follow".to_string(),
                ));
            }
        }
        InvitePreference::None => {
            return Err(AppError::Forbidden(
                "this user does not accept invites".to_string(),
            ));
        }
    }

    state.rooms.add_participant(room_id, body.user_id).await?;
    tracing::info!(%room_id, invitee = %body.user_id, inviter = %user_id, "User invited to room");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/rooms/:id/complete
///
/// Creator-only. Idempotent: completing twice keeps the first completion
/// time.
pub async fn complete(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<WatchRoom>> {
    let room = fetch_room(&state, room_id).await?;

    if room.creator_id != user_id {
        return Err(AppError::Forbidden(
            "only the room creator can complete it".to_string(),
        ));
    }

    let completed = state
        .rooms
        .complete_room(room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("room".to_string()))?;

    Ok(Json(completed))
}

async fn fetch_room(state: &AppState, room_id: Uuid) -> AppResult<WatchRoom> {
    state
        .rooms
        .get_room(room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("room".to_string()))
}
