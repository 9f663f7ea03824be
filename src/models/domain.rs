use serde::{Deserialize, Serialize};

/// Dog profile with traits, location and presentation data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogProfile {
    #[serde(rename = "dogId", alias = "id")]
    pub dog_id: String,
    #[serde(rename = "ownerId", alias = "owner_id")]
    pub owner_id: String,
    pub name: String,
    pub breed: String,
    pub age: u8,
    #[serde(rename = "weightLbs", alias = "weight")]
    pub weight_lbs: u16,
    pub sex: Sex,
    pub neutered: bool,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(rename = "dogSociability", alias = "sociability")]
    pub dog_sociability: u8,
    #[serde(rename = "humanSociability", alias = "human_sociability", default = "default_ordinal")]
    pub human_sociability: u8,
    pub temperament: u8,
    pub city: String,
    pub state: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(default, alias = "about")]
    pub bio: Option<String>,
    #[serde(rename = "imageUrls", alias = "images", default)]
    pub image_urls: Vec<String>,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl DogProfile {
    /// Two dogs share a region when their state matches
    pub fn in_same_state(&self, other: &DogProfile) -> bool {
        self.state == other.state
    }
}

fn default_ordinal() -> u8 { 3 }

/// Biological sex, encoded as {female: 0, male: 1} in the trait vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_binary(&self) -> f64 {
        match self {
            Sex::Female => 0.0,
            Sex::Male => 1.0,
        }
    }
}

/// Review left by an owner for a dog they met
///
/// One review per (reviewer, dog) pair; uniqueness is enforced by the
/// record store, not re-checked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "dogId", alias = "dog_id")]
    pub dog_id: String,
    #[serde(rename = "ownerId", alias = "owner_id")]
    pub owner_id: String,
    pub rating: u8,
    #[serde(alias = "description")]
    pub comment: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Scored candidate produced per ranking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "dogId")]
    pub dog_id: String,
    pub name: String,
    pub breed: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "imageUrls")]
    pub image_urls: Vec<String>,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: f64,
    #[serde(rename = "cosineSimilarity")]
    pub cosine_similarity: f64,
    #[serde(rename = "sentimentScore")]
    pub sentiment_score: f64,
    #[serde(rename = "reviewCount")]
    pub review_count: usize,
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    #[serde(rename = "isCompatible")]
    pub is_compatible: bool,
}

/// Per-trait weights applied after range normalization
#[derive(Debug, Clone, Copy)]
pub struct TraitWeights {
    pub age: f64,
    pub weight: f64,
    pub sex: f64,
    pub neutered: f64,
    pub sociability: f64,
    pub temperament: f64,
}

impl Default for TraitWeights {
    fn default() -> Self {
        Self {
            age: 1.0,
            weight: 0.8,
            sex: 0.6,
            neutered: 0.7,
            sociability: 1.2,
            temperament: 1.1,
        }
    }
}

/// Tunables for the composite score and its verdict
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityConfig {
    /// Composite score at or above this value means "compatible"
    pub threshold: f64,
    /// Smoothing constant in the sentiment damping terms
    pub smoothing_k: f64,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            threshold: crate::core::scoring::DEFAULT_COMPATIBILITY_THRESHOLD,
            smoothing_k: crate::core::scoring::DEFAULT_SMOOTHING_K,
        }
    }
}
