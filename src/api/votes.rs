use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::VoteValue;

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub media_id: Uuid,
    pub vote: String,
}

#[derive(Debug, Serialize)]
pub struct CastVoteResponse {
    pub success: bool,
    pub is_match: bool,
}

/// POST /api/rooms/:id/votes
///
/// Records or replaces the caller's vote and, for a "yes", reports whether
/// the item now qualifies as a match. A failed match check never fails the
/// vote; it is logged and reported as no match.
pub async fn cast(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
    Json(body): Json<CastVoteRequest>,
) -> AppResult<Json<CastVoteResponse>> {
    let value = VoteValue::parse(&body.vote).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "invalid vote '{}': expected yes, no, or maybe",
            body.vote
        ))
    })?;

    let room = state
        .rooms
        .get_room(room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("room".to_string()))?;

    if !room.status.is_active() {
        return Err(AppError::InvalidInput(
            "room is no longer active".to_string(),
        ));
    }

    if !state.rooms.is_participant(room_id, user_id).await? {
        return Err(AppError::Forbidden(
            "you are not a participant of this room".to_string(),
        ));
    }

    state
        .votes
        .cast_vote(room_id, user_id, body.media_id, value)
        .await?;

    let is_match = if value.is_yes() {
        match state.matcher.is_match(room_id, body.media_id).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(%room_id, media_id = %body.media_id, error = %e, "Match check failed after vote");
                false
            }
        }
    } else {
        false
    };

    if is_match {
        tracing::info!(%room_id, media_id = %body.media_id, "Match detected");
    }

    Ok(Json(CastVoteResponse {
        success: true,
        is_match,
    }))
}
