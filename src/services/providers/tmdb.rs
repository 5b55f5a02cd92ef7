/// TMDB metadata provider
///
/// Thin client over the TMDB v3 API with Redis read-through caching:
/// searches are cached briefly, per-movie details for a week.
use std::time::Duration;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{TmdbMovie, TmdbSearchPage},
    services::providers::MetadataProvider,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbClient {
    http_client: reqwest::Client,
    cache: Cache,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            cache,
            api_key,
            api_url,
        })
    }

    async fn fetch_details(&self, tmdb_id: i64) -> AppResult<TmdbMovie> {
        let url = format!("{}/movie/{}", self.api_url, tmdb_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for movie {}",
                status, tmdb_id
            )));
        }

        let movie: TmdbMovie = response.json().await?;
        Ok(movie)
    }

    async fn fetch_search(&self, query: &str) -> AppResult<TmdbSearchPage> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for search",
                status
            )));
        }

        let page: TmdbSearchPage = response.json().await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            "TMDB search completed"
        );

        Ok(page)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<TmdbMovie> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(tmdb_id),
            DETAILS_CACHE_TTL,
            async move { self.fetch_details(tmdb_id).await }
        )
    }

    async fn search_movies(&self, query: &str) -> AppResult<TmdbSearchPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move { self.fetch_search(query).await }
        )
    }
}
