use crate::models::domain::ScoredCandidate;
use serde::{Deserialize, Serialize};

/// Response for the feed and ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub results: Vec<ScoredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the pairwise similarity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResponse {
    #[serde(rename = "dogId")]
    pub dog_id: String,
    #[serde(rename = "otherDogId")]
    pub other_dog_id: String,
    #[serde(rename = "cosineSimilarity")]
    pub cosine_similarity: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
