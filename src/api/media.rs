use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::error::AppResult;
use crate::models::TmdbMovie;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// A search hit, enriched with the local media id when the record could be
/// cached. The local id is a separate field because the flattened movie
/// already carries a TMDB `id`; a missing `media_id` means the cache write
/// failed for that hit, and the search still succeeds.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub media_id: Option<Uuid>,
    #[serde(flatten)]
    pub movie: TmdbMovie,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub page: i64,
    pub results: Vec<SearchHit>,
    pub total_pages: i64,
    pub total_results: i64,
}

/// GET /api/media/search?query=...
///
/// Searches the metadata provider and caches every hit locally so votes can
/// reference them by id immediately.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let page = state.metadata.search_movies(&params.query).await?;

    let mut results = Vec::with_capacity(page.results.len());
    for movie in page.results {
        let media_id = match state.media.upsert_movie(&movie).await {
            Ok(item) => Some(item.id),
            Err(e) => {
                tracing::warn!(tmdb_id = movie.id, error = %e, "Failed to cache search hit");
                None
            }
        };
        results.push(SearchHit { media_id, movie });
    }

    Ok(Json(SearchResponse {
        page: page.page,
        results,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }))
}
