use std::sync::Arc;

use uuid::Uuid;

use crate::db::{MediaCache, VoteLedger};
use crate::error::AppResult;
use crate::models::{MediaItem, MediaKind};
use crate::services::providers::{MetadataProvider, SuggestionProvider};

/// Turns a room's liked titles into a vetted list of suggested media.
///
/// All collaborators are injected so each can be replaced with a test
/// double: the suggestion oracle, the metadata provider, the vote ledger
/// (for the liked-title seed), and the media cache (for resolving
/// candidates to local records).
pub struct RecommendationService {
    suggester: Arc<dyn SuggestionProvider>,
    metadata: Arc<dyn MetadataProvider>,
    votes: Arc<dyn VoteLedger>,
    media: Arc<dyn MediaCache>,
}

impl RecommendationService {
    pub fn new(
        suggester: Arc<dyn SuggestionProvider>,
        metadata: Arc<dyn MetadataProvider>,
        votes: Arc<dyn VoteLedger>,
        media: Arc<dyn MediaCache>,
    ) -> Self {
        Self {
            suggester,
            metadata,
            votes,
            media,
        }
    }

    /// Generates recommendations for a room.
    ///
    /// An oracle failure fails the whole request; a failure to resolve any
    /// single candidate only drops that candidate. A successful result may
    /// therefore be shorter than the oracle's list, and is empty without
    /// error when nothing has been liked yet.
    pub async fn generate(&self, session_id: Uuid) -> AppResult<Vec<MediaItem>> {
        let liked_titles = self.votes.list_liked_titles(session_id).await?;

        if liked_titles.is_empty() {
            tracing::debug!(%session_id, "No liked titles, skipping oracle");
            return Ok(Vec::new());
        }

        let candidate_ids = self.suggester.suggest(&liked_titles).await?;

        let mut recommendations = Vec::with_capacity(candidate_ids.len());
        for tmdb_id in candidate_ids {
            match self.resolve_candidate(tmdb_id).await {
                Ok(item) => recommendations.push(item),
                Err(e) => {
                    tracing::warn!(tmdb_id, error = %e, "Skipping unresolvable candidate");
                }
            }
        }

        tracing::info!(
            %session_id,
            recommended = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Resolves one candidate id to a local media record, fetching and
    /// caching it when it is not already known.
    async fn resolve_candidate(&self, tmdb_id: i64) -> AppResult<MediaItem> {
        if let Some(existing) = self.media.get_by_tmdb_id(tmdb_id, MediaKind::Movie).await? {
            return Ok(existing);
        }

        let movie = self.metadata.movie_details(tmdb_id).await?;
        self.media.upsert_movie(&movie).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::media::MockMediaCache;
    use crate::db::votes::MockVoteLedger;
    use crate::error::AppError;
    use crate::models::TmdbMovie;
    use crate::services::providers::{MockMetadataProvider, MockSuggestionProvider};
    use chrono::Utc;

    fn media_item(tmdb_id: i64, title: &str) -> MediaItem {
        MediaItem {
            id: Uuid::new_v4(),
            tmdb_id,
            media_type: MediaKind::Movie,
            title: title.to_string(),
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tmdb_movie(id: i64, title: &str) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            adult: None,
            original_language: None,
            genre_ids: None,
        }
    }

    fn service(
        suggester: MockSuggestionProvider,
        metadata: MockMetadataProvider,
        votes: MockVoteLedger,
        media: MockMediaCache,
    ) -> RecommendationService {
        RecommendationService::new(
            Arc::new(suggester),
            Arc::new(metadata),
            Arc::new(votes),
            Arc::new(media),
        )
    }

    #[tokio::test]
    async fn test_no_likes_short_circuits_without_oracle_call() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(Vec::new()));

        let mut suggester = MockSuggestionProvider::new();
        suggester.expect_suggest().times(0);

        let svc = service(
            suggester,
            MockMetadataProvider::new(),
            votes,
            MockMediaCache::new(),
        );

        let result = svc.generate(Uuid::new_v4()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_oracle_failure_is_a_hard_error() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(vec!["Inception".to_string()]));

        let mut suggester = MockSuggestionProvider::new();
        suggester
            .expect_suggest()
            .returning(|_| Err(AppError::ExternalApi("oracle timed out".to_string())));

        let svc = service(
            suggester,
            MockMetadataProvider::new(),
            votes,
            MockMediaCache::new(),
        );

        let result = svc.generate(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_cached_candidates_skip_the_metadata_provider() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(vec!["Inception".to_string()]));

        let mut suggester = MockSuggestionProvider::new();
        suggester.expect_suggest().returning(|_| Ok(vec![603]));

        let mut media = MockMediaCache::new();
        media
            .expect_get_by_tmdb_id()
            .returning(|id, _| Ok(Some(media_item(id, "The Matrix"))));
        media.expect_upsert_movie().times(0);

        let mut metadata = MockMetadataProvider::new();
        metadata.expect_movie_details().times(0);

        let svc = service(suggester, metadata, votes, media);
        let result = svc.generate(Uuid::new_v4()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].tmdb_id, 603);
    }

    #[tokio::test]
    async fn test_unknown_candidates_are_fetched_and_cached() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(vec!["Inception".to_string()]));

        let mut suggester = MockSuggestionProvider::new();
        suggester.expect_suggest().returning(|_| Ok(vec![550]));

        let mut media = MockMediaCache::new();
        media.expect_get_by_tmdb_id().returning(|_, _| Ok(None));
        media
            .expect_upsert_movie()
            .times(1)
            .returning(|movie| Ok(media_item(movie.id, &movie.title)));

        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_movie_details()
            .times(1)
            .returning(|id| Ok(tmdb_movie(id, "Fight Club")));

        let svc = service(suggester, metadata, votes, media);
        let result = svc.generate(Uuid::new_v4()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Fight Club");
    }

    #[tokio::test]
    async fn test_one_bad_candidate_does_not_abort_the_batch() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(vec!["Inception".to_string()]));

        let mut suggester = MockSuggestionProvider::new();
        suggester
            .expect_suggest()
            .returning(|_| Ok(vec![1, 2, 3, 4, 5]));

        let mut media = MockMediaCache::new();
        media.expect_get_by_tmdb_id().returning(|_, _| Ok(None));
        media
            .expect_upsert_movie()
            .returning(|movie| Ok(media_item(movie.id, &movie.title)));

        let mut metadata = MockMetadataProvider::new();
        metadata.expect_movie_details().returning(|id| {
            if id == 3 {
                Err(AppError::ExternalApi("metadata lookup failed".to_string()))
            } else {
                Ok(tmdb_movie(id, &format!("Movie {}", id)))
            }
        });

        let svc = service(suggester, metadata, votes, media);
        let result = svc.generate(Uuid::new_v4()).await.unwrap();

        assert_eq!(result.len(), 4);
        let ids: Vec<i64> = result.iter().map(|m| m.tmdb_id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[tokio::test]
    async fn test_cache_write_failure_drops_only_that_candidate() {
        let mut votes = MockVoteLedger::new();
        votes
            .expect_list_liked_titles()
            .returning(|_| Ok(vec!["Inception".to_string()]));

        let mut suggester = MockSuggestionProvider::new();
        suggester.expect_suggest().returning(|_| Ok(vec![10, 20]));

        let mut media = MockMediaCache::new();
        media.expect_get_by_tmdb_id().returning(|_, _| Ok(None));
        media.expect_upsert_movie().returning(|movie| {
            if movie.id == 10 {
                Err(AppError::Database(sqlx::Error::PoolClosed))
            } else {
                Ok(media_item(movie.id, &movie.title))
            }
        });

        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_movie_details()
            .returning(|id| Ok(tmdb_movie(id, &format!("Movie {}", id))));

        let svc = service(suggester, metadata, votes, media);
        let result = svc.generate(Uuid::new_v4()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].tmdb_id, 20);
    }
}
