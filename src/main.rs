use std::sync::Arc;

use reelmatch::api::{create_router, AppState};
use reelmatch::config::Config;
use reelmatch::db::{
    create_pool, create_redis_client, Cache, MediaCache, PgMediaCache, PgProfileStore, PgRoomStore,
    PgVoteLedger, ProfileStore, RoomStore, VoteLedger,
};
use reelmatch::services::providers::{
    MetadataProvider, OpenAiSuggester, SuggestionProvider, TmdbClient,
};
use reelmatch::services::{MatchDetector, MatchPolicy, RecommendationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelmatch=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let redis_client = create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);

    let metadata: Arc<dyn MetadataProvider> = Arc::new(TmdbClient::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )?);
    let suggester: Arc<dyn SuggestionProvider> = Arc::new(OpenAiSuggester::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
    )?);

    let rooms: Arc<dyn RoomStore> = Arc::new(PgRoomStore::new(pool.clone()));
    let votes: Arc<dyn VoteLedger> = Arc::new(PgVoteLedger::new(pool.clone()));
    let media: Arc<dyn MediaCache> = Arc::new(PgMediaCache::new(pool.clone()));
    let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(pool));

    let matcher = MatchDetector::new(
        votes.clone(),
        MatchPolicy {
            min_yes_votes: config.match_threshold,
        },
    );
    let recommender = Arc::new(RecommendationService::new(
        suggester,
        metadata.clone(),
        votes.clone(),
        media.clone(),
    ));

    let state = AppState {
        rooms,
        votes,
        media,
        profiles,
        metadata,
        matcher,
        recommender,
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
