use std::sync::Arc;

use crate::db::{MediaCache, ProfileStore, RoomStore, VoteLedger};
use crate::services::providers::MetadataProvider;
use crate::services::{MatchDetector, RecommendationService};

/// Shared application state: every dependency behind a trait object so the
/// integration tests can assemble the same router over in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomStore>,
    pub votes: Arc<dyn VoteLedger>,
    pub media: Arc<dyn MediaCache>,
    pub profiles: Arc<dyn ProfileStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub matcher: MatchDetector,
    pub recommender: Arc<RecommendationService>,
    pub jwt_secret: String,
}
