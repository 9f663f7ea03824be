use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for the curated "for you" feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CuratedFeedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "dog_id", rename = "dogId")]
    pub dog_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

/// Request for a generic ranking pass over the whole listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "dog_id", rename = "dogId")]
    pub dog_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    #[serde(alias = "excludeDogIds", rename = "excludeDogIds")]
    pub exclude_dog_ids: Vec<String>,
}

fn default_limit() -> u16 {
    20
}

/// Query for the display-only trait similarity of one pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimilarityQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "dog_id", rename = "dogId")]
    pub dog_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "other_dog_id", rename = "otherDogId")]
    pub other_dog_id: String,
}
