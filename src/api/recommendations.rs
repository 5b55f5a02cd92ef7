use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::MediaItem;

/// GET /api/rooms/:id/recommendations
///
/// An empty array is a normal outcome when nobody has liked anything yet.
pub async fn list(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<Vec<MediaItem>>> {
    if state.rooms.get_room(room_id).await?.is_none() {
        return Err(AppError::NotFound("room".to_string()));
    }

    if !state.rooms.is_participant(room_id, user_id).await? {
        return Err(AppError::Forbidden(
            "you are not a participant of this room".to_string(),
        ));
    }

    let recommendations = state.recommender.generate(room_id).await?;
    Ok(Json(recommendations))
}
