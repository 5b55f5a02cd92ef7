use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{matches, media, recommendations, rooms, social, votes, AppState};
use crate::middleware::{auth, request_id};

/// Creates the application router. Everything under /api requires a valid
/// bearer token; /health is public.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Media
        .route("/media/search", get(media::search))
        // Rooms
        .route("/rooms", post(rooms::create).get(rooms::list_mine))
        .route("/rooms/:id", get(rooms::get_by_id))
        .route("/rooms/:id/invite", post(rooms::invite))
        .route("/rooms/:id/complete", post(rooms::complete))
        // Voting & matching
        .route("/rooms/:id/votes", post(votes::cast))
        .route("/rooms/:id/matches", get(matches::list))
        .route("/rooms/:id/recommendations", get(recommendations::list))
        // Social
        .route("/users/search", get(social::search_users))
        .route(
            "/users/:id/follow",
            post(social::follow).delete(social::unfollow),
        )
        .route("/me/following", get(social::following))
        .route(
            "/me/profile",
            get(social::get_profile).put(social::update_profile),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
