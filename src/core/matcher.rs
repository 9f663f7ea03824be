use crate::core::embedding::TraitEmbedder;
use crate::core::scoring::{compatibility_score, is_compatible};
use crate::core::sentiment::SentimentBackend;
use crate::core::similarity::cosine_similarity;
use crate::models::{CompatibilityConfig, DogProfile, Review, ScoredCandidate};
use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

/// Failure while fetching reviews for one dog
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("review lookup failed: {0}")]
    Lookup(String),
}

/// Read-only source of reviews, implemented by the record store client
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn reviews_for(&self, dog_id: &str) -> Result<Vec<Review>, FetchError>;
}

/// Result of a ranking pass
#[derive(Debug)]
pub struct RankResult {
    pub results: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Feed ranker
///
/// Embeds both profiles, measures cosine similarity, enriches with each
/// side's review sentiment and produces an ordered list of scored
/// candidates. Review fetch and sentiment estimation fan out concurrently
/// per candidate; one candidate's lookup failure drops that candidate only.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    embedder: TraitEmbedder,
    config: CompatibilityConfig,
}

impl Matcher {
    pub fn new(embedder: TraitEmbedder, config: CompatibilityConfig) -> Self {
        Self { embedder, config }
    }

    pub fn with_defaults() -> Self {
        Self {
            embedder: TraitEmbedder::with_defaults(),
            config: CompatibilityConfig::default(),
        }
    }

    /// Trait similarity without sentiment enrichment, for display-only use
    pub fn similarity_only(&self, reference: &DogProfile, candidate: &DogProfile) -> f64 {
        cosine_similarity(
            &self.embedder.embed(reference),
            &self.embedder.embed(candidate),
        )
    }

    /// Rank candidates by composite score, highest first
    ///
    /// No threshold filtering; callers choose how many top results to keep
    /// via `limit`.
    pub async fn rank(
        &self,
        reference: &DogProfile,
        candidates: Vec<DogProfile>,
        reviews: &dyn ReviewSource,
        sentiment: &dyn SentimentBackend,
        limit: usize,
    ) -> RankResult {
        let (mut results, total_candidates) = self
            .score_candidates(reference, candidates, reviews, sentiment)
            .await;

        results.truncate(limit);

        RankResult {
            results,
            total_candidates,
        }
    }

    /// Curated "for you" feed: same-state candidates at or above the
    /// compatibility threshold
    pub async fn curated_feed(
        &self,
        reference: &DogProfile,
        candidates: Vec<DogProfile>,
        reviews: &dyn ReviewSource,
        sentiment: &dyn SentimentBackend,
        limit: usize,
    ) -> RankResult {
        let regional: Vec<DogProfile> = candidates
            .into_iter()
            .filter(|c| c.in_same_state(reference))
            .collect();

        let (mut results, total_candidates) = self
            .score_candidates(reference, regional, reviews, sentiment)
            .await;

        results.retain(|c| c.is_compatible);
        results.truncate(limit);

        RankResult {
            results,
            total_candidates,
        }
    }

    /// Score every candidate and sort descending by composite score
    ///
    /// The sort is stable, so ties keep their input order. The reference's
    /// own reviews are fetched once; a failed lookup there degrades to
    /// neutral sentiment rather than failing the whole request.
    async fn score_candidates(
        &self,
        reference: &DogProfile,
        candidates: Vec<DogProfile>,
        reviews: &dyn ReviewSource,
        sentiment: &dyn SentimentBackend,
    ) -> (Vec<ScoredCandidate>, usize) {
        let reference_embedding = self.embedder.embed(reference);

        let reference_sentiment = match reviews.reviews_for(&reference.dog_id).await {
            Ok(own) => sentiment.estimate(&comments(&own)).await,
            Err(e) => {
                tracing::warn!(
                    "Review lookup failed for reference {}, using neutral sentiment: {}",
                    reference.dog_id,
                    e
                );
                0.0
            }
        };

        let scored = candidates
            .into_iter()
            .filter(|c| c.dog_id != reference.dog_id)
            .map(|candidate| {
                let reference_embedding = &reference_embedding;
                async move {
                    let candidate_reviews = match reviews.reviews_for(&candidate.dog_id).await {
                        Ok(r) => r,
                        Err(e) => {
                            tracing::warn!("Dropping candidate {}: {}", candidate.dog_id, e);
                            return None;
                        }
                    };

                    let candidate_sentiment =
                        sentiment.estimate(&comments(&candidate_reviews)).await;

                    let cosine = cosine_similarity(
                        reference_embedding,
                        &self.embedder.embed(&candidate),
                    );

                    let score = compatibility_score(
                        cosine,
                        reference_sentiment,
                        candidate_sentiment,
                        self.config.smoothing_k,
                    );

                    Some(ScoredCandidate {
                        dog_id: candidate.dog_id,
                        name: candidate.name,
                        breed: candidate.breed,
                        city: candidate.city,
                        state: candidate.state,
                        image_urls: candidate.image_urls,
                        compatibility_score: score,
                        cosine_similarity: cosine,
                        sentiment_score: candidate_sentiment,
                        review_count: candidate_reviews.len(),
                        average_rating: average_rating(&candidate_reviews),
                        is_compatible: is_compatible(score, self.config.threshold),
                    })
                }
            });

        let mut results: Vec<ScoredCandidate> =
            join_all(scored).await.into_iter().flatten().collect();
        let total_candidates = results.len();

        results.sort_by(|a, b| {
            b.compatibility_score
                .partial_cmp(&a.compatibility_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        (results, total_candidates)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn comments(reviews: &[Review]) -> Vec<String> {
    reviews.iter().map(|r| r.comment.clone()).collect()
}

fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64
}
