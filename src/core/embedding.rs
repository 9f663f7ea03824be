use crate::models::{DogProfile, TraitWeights};

/// Number of traits in the embedding
pub const EMBEDDING_DIM: usize = 6;

/// Normalization ranges for the non-ordinal traits
const AGE_RANGE: (f64, f64) = (0.0, 20.0);
const WEIGHT_RANGE: (f64, f64) = (1.0, 200.0);
const BINARY_RANGE: (f64, f64) = (0.0, 1.0);

/// Ordinal scale used for sociability and temperament
///
/// Profiles store 1-5 ordinals. The ten-point variant doubles them and
/// widens the normalization range accordingly; which scale is in effect is
/// a deployment-level choice, not hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SociabilityScale {
    FivePoint,
    TenPoint,
}

impl SociabilityScale {
    /// Map a stored 1-5 ordinal onto this scale
    #[inline]
    pub fn ordinal(&self, stored: u8) -> f64 {
        match self {
            SociabilityScale::FivePoint => stored as f64,
            SociabilityScale::TenPoint => (stored as f64) * 2.0,
        }
    }

    /// Normalization range for ordinals on this scale
    #[inline]
    pub fn range(&self) -> (f64, f64) {
        match self {
            SociabilityScale::FivePoint => (1.0, 5.0),
            SociabilityScale::TenPoint => (1.0, 10.0),
        }
    }
}

impl Default for SociabilityScale {
    fn default() -> Self {
        SociabilityScale::FivePoint
    }
}

/// Converts a dog's comparable traits into a weighted, L2-normalized vector
///
/// Uses age, weight, sex, neutered, dog-sociability and temperament.
/// Human-sociability and breed are intentionally left out of the numeric
/// embedding. Inputs are expected to lie in their declared ranges; values
/// outside them are a caller error and are not clamped, keeping the
/// transform pure and deterministic.
#[derive(Debug, Clone, Copy)]
pub struct TraitEmbedder {
    weights: TraitWeights,
    scale: SociabilityScale,
}

impl TraitEmbedder {
    pub fn new(weights: TraitWeights, scale: SociabilityScale) -> Self {
        Self { weights, scale }
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: TraitWeights::default(),
            scale: SociabilityScale::default(),
        }
    }

    /// Build the trait vector for a profile
    ///
    /// Each trait is normalized to [0,1] over its range, scaled by its
    /// weight, then the whole vector is L2-normalized. An all-zero vector
    /// is returned as-is rather than divided by its zero norm.
    pub fn embed(&self, dog: &DogProfile) -> Vec<f64> {
        let ordinal_range = self.scale.range();

        let mut embedding = vec![
            normalize(dog.age as f64, AGE_RANGE) * self.weights.age,
            normalize(dog.weight_lbs as f64, WEIGHT_RANGE) * self.weights.weight,
            normalize(dog.sex.as_binary(), BINARY_RANGE) * self.weights.sex,
            normalize(if dog.neutered { 1.0 } else { 0.0 }, BINARY_RANGE) * self.weights.neutered,
            normalize(self.scale.ordinal(dog.dog_sociability), ordinal_range) * self.weights.sociability,
            normalize(self.scale.ordinal(dog.temperament), ordinal_range) * self.weights.temperament,
        ];

        let norm = embedding.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in embedding.iter_mut() {
                *v /= norm;
            }
        }

        embedding
    }
}

/// Normalize a value to [0,1] over a closed range
#[inline]
fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    (value - min) / (max - min)
}
