use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::MediaItem;

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MediaItem>,
    pub count: usize,
}

/// GET /api/rooms/:id/matches
pub async fn list(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<MatchesResponse>> {
    if state.rooms.get_room(room_id).await?.is_none() {
        return Err(AppError::NotFound("room".to_string()));
    }

    if !state.rooms.is_participant(room_id, user_id).await? {
        return Err(AppError::Forbidden(
            "you are not a participant of this room".to_string(),
        ));
    }

    let matches = state.matcher.list_matches(room_id).await?;
    let count = matches.len();

    Ok(Json(MatchesResponse { matches, count }))
}
