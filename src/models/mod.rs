// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CompatibilityConfig, DogProfile, Review, ScoredCandidate, Sex, TraitWeights};
pub use requests::{CuratedFeedRequest, RankRequest, SimilarityQuery};
pub use responses::{ErrorResponse, FeedResponse, HealthResponse, SimilarityResponse};
