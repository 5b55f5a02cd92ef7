use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{InvitePreference, Profile};

#[derive(Debug, Deserialize)]
pub struct UserSearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub invite_preference: String,
}

/// GET /api/users/search?query=...
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> AppResult<Json<Vec<Profile>>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "search query must not be empty".to_string(),
        ));
    }

    let profiles = state.profiles.search_users(query).await?;
    Ok(Json(profiles))
}

/// POST /api/users/:id/follow
pub async fn follow(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if target_id == user_id {
        return Err(AppError::InvalidInput(
            "you cannot follow yourself".to_string(),
        ));
    }

    state.profiles.follow(user_id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/:id/follow
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.profiles.unfollow(user_id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me/following
pub async fn following(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<Vec<Profile>>> {
    let profiles = state.profiles.list_following(user_id).await?;
    Ok(Json(profiles))
}

/// GET /api/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_string()))?;

    Ok(Json(profile))
}

/// PUT /api/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }

    let preference = InvitePreference::parse(&body.invite_preference).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "invalid invite preference '{}': expected anyone, following, or none",
            body.invite_preference
        ))
    })?;

    state
        .profiles
        .upsert_profile(user_id, username, preference)
        .await?;

    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::Internal("profile missing after upsert".to_string()))?;

    Ok(Json(profile))
}
