pub mod matching;
pub mod providers;
pub mod recommendations;

pub use matching::MatchDetector;
pub use matching::MatchPolicy;
pub use recommendations::RecommendationService;
