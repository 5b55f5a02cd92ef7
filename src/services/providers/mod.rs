/// External collaborator abstractions
///
/// Both external services the core consumes sit behind traits so the
/// orchestrator and handlers take injected dependencies rather than global
/// clients, and tests can substitute doubles.
use crate::{
    error::AppResult,
    models::{TmdbMovie, TmdbSearchPage},
};

pub mod openai;
pub mod tmdb;

pub use openai::OpenAiSuggester;
pub use tmdb::TmdbClient;

/// The suggestion oracle: given titles a group liked, produce candidate
/// TMDB ids. Non-deterministic, may fail or return garbage; both are
/// surfaced as errors, never panics.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, liked_titles: &[String]) -> AppResult<Vec<i64>>;
}

/// The movie-metadata provider: resolve a TMDB id to full details, and
/// search titles by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<TmdbMovie>;

    async fn search_movies(&self, query: &str) -> AppResult<TmdbSearchPage>;
}
