// Integration tests for the Paw Palooza compatibility service

use async_trait::async_trait;
use pawpal_algo::core::{
    embedding::TraitEmbedder,
    matcher::{FetchError, Matcher, ReviewSource},
    sentiment::LexicalSentiment,
};
use pawpal_algo::models::{CompatibilityConfig, DogProfile, Review, Sex};
use pawpal_algo::services::RemoteSentiment;
use std::collections::HashMap;

struct InMemoryReviews {
    by_dog: HashMap<String, Vec<Review>>,
    fail_for: Vec<String>,
}

impl InMemoryReviews {
    fn new() -> Self {
        Self {
            by_dog: HashMap::new(),
            fail_for: vec![],
        }
    }

    fn with_reviews(mut self, dog_id: &str, comments: &[&str], rating: u8) -> Self {
        let reviews = comments
            .iter()
            .map(|c| Review {
                dog_id: dog_id.to_string(),
                owner_id: "reviewer".to_string(),
                rating,
                comment: c.to_string(),
                created_at: None,
            })
            .collect();
        self.by_dog.insert(dog_id.to_string(), reviews);
        self
    }

    fn failing_for(mut self, dog_id: &str) -> Self {
        self.fail_for.push(dog_id.to_string());
        self
    }
}

#[async_trait]
impl ReviewSource for InMemoryReviews {
    async fn reviews_for(&self, dog_id: &str) -> Result<Vec<Review>, FetchError> {
        if self.fail_for.iter().any(|id| id == dog_id) {
            return Err(FetchError::Lookup("record store unavailable".to_string()));
        }
        Ok(self.by_dog.get(dog_id).cloned().unwrap_or_default())
    }
}

fn create_dog(id: &str, state: &str, age: u8, weight_lbs: u16, sociability: u8) -> DogProfile {
    DogProfile {
        dog_id: id.to_string(),
        owner_id: format!("owner_{}", id),
        name: format!("Dog {}", id),
        breed: "Labrador".to_string(),
        age,
        weight_lbs,
        sex: Sex::Female,
        neutered: true,
        vaccinated: true,
        dog_sociability: sociability,
        human_sociability: 4,
        temperament: 4,
        city: "Boston".to_string(),
        state: state.to_string(),
        latitude: 42.3601,
        longitude: -71.0589,
        bio: None,
        image_urls: vec![],
        created_at: None,
    }
}

fn permissive_matcher() -> Matcher {
    // The sentiment damping terms cap the composite at 0.5 with k=1, so the
    // curated-feed tests run the lower historical cutoff
    Matcher::new(
        TraitEmbedder::with_defaults(),
        CompatibilityConfig {
            threshold: 0.4,
            smoothing_k: 1.0,
        },
    )
}

const PRAISE: [&str; 3] = [
    "Amazing dog! So friendly and gentle!",
    "Wonderful! Perfect playmate, highly recommend!",
    "Excellent temperament, smart and playful!",
];

#[tokio::test]
async fn test_perfect_trait_match_without_reviews_is_not_compatible() {
    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let twin = create_dog("twin", "MA", 3, 65, 4);
    let reviews = InMemoryReviews::new();

    let result = matcher
        .rank(&reference, vec![twin], &reviews, &LexicalSentiment, 10)
        .await;

    assert_eq!(result.results.len(), 1);
    let top = &result.results[0];
    assert!((top.cosine_similarity - 1.0).abs() < 1e-9);
    assert!((top.compatibility_score - 0.3).abs() < 1e-9);
    // Sentiment, not trait similarity alone, gates the verdict
    assert!(!top.is_compatible);
}

#[tokio::test]
async fn test_region_gate_excludes_out_of_state_dogs() {
    let matcher = permissive_matcher();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![
        create_dog("local", "MA", 3, 65, 4),
        create_dog("remote", "NY", 3, 65, 4),
    ];
    let reviews = InMemoryReviews::new()
        .with_reviews("ref", &PRAISE, 5)
        .with_reviews("local", &PRAISE, 5)
        .with_reviews("remote", &PRAISE, 5);

    let curated = matcher
        .curated_feed(&reference, candidates.clone(), &reviews, &LexicalSentiment, 10)
        .await;

    assert_eq!(curated.results.len(), 1);
    assert_eq!(curated.results[0].dog_id, "local");
    assert!(curated.results[0].is_compatible);

    // The same out-of-state dog appears in an unfiltered ranking
    let ranked = matcher
        .rank(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;
    assert!(ranked.results.iter().any(|c| c.dog_id == "remote"));
}

#[tokio::test]
async fn test_curated_feed_filters_below_threshold() {
    let matcher = permissive_matcher();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![
        create_dog("praised", "MA", 3, 65, 4),
        create_dog("unreviewed", "MA", 3, 65, 4),
    ];
    let reviews = InMemoryReviews::new()
        .with_reviews("ref", &PRAISE, 5)
        .with_reviews("praised", &PRAISE, 5);

    let curated = matcher
        .curated_feed(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;

    // The unreviewed twin stays below even the 0.4 cutoff
    assert_eq!(curated.results.len(), 1);
    assert_eq!(curated.results[0].dog_id, "praised");
}

#[tokio::test]
async fn test_one_failing_candidate_does_not_abort_the_batch() {
    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![
        create_dog("a", "MA", 3, 65, 4),
        create_dog("broken", "MA", 4, 70, 3),
        create_dog("b", "MA", 5, 55, 2),
    ];
    let reviews = InMemoryReviews::new().failing_for("broken");

    let result = matcher
        .rank(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;

    let ids: Vec<&str> = result.results.iter().map(|c| c.dog_id.as_str()).collect();
    assert_eq!(result.results.len(), 2);
    assert!(ids.contains(&"a") && ids.contains(&"b"));
}

#[tokio::test]
async fn test_results_ordered_descending_with_stable_ties() {
    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    // Two identical candidates tie exactly; the stable sort keeps their
    // input order
    let candidates = vec![
        create_dog("first_twin", "MA", 3, 65, 4),
        create_dog("second_twin", "MA", 3, 65, 4),
        create_dog("different", "MA", 12, 20, 1),
    ];
    let reviews = InMemoryReviews::new();

    let result = matcher
        .rank(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;

    assert_eq!(result.results.len(), 3);
    for pair in result.results.windows(2) {
        assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
    }
    assert_eq!(result.results[0].dog_id, "first_twin");
    assert_eq!(result.results[1].dog_id, "second_twin");
}

#[tokio::test]
async fn test_review_aggregates_surface_on_results() {
    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![create_dog("reviewed", "MA", 3, 65, 4)];
    let reviews = InMemoryReviews::new().with_reviews("reviewed", &PRAISE, 4);

    let result = matcher
        .rank(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;

    let top = &result.results[0];
    assert_eq!(top.review_count, 3);
    assert!((top.average_rating - 4.0).abs() < 1e-9);
    assert!(top.sentiment_score > 0.0);
}

#[tokio::test]
async fn test_failing_remote_sentiment_matches_lexical_ranking() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/sentiment")
        .with_status(503)
        .create_async()
        .await;

    let remote = RemoteSentiment::new(format!("{}/api/sentiment", server.url()), 5);

    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![
        create_dog("a", "MA", 3, 65, 4),
        create_dog("b", "MA", 6, 80, 2),
    ];
    let reviews = InMemoryReviews::new()
        .with_reviews("ref", &PRAISE, 5)
        .with_reviews("a", &PRAISE, 5)
        .with_reviews("b", &["Nice dog but can be a bit stubborn."], 3);

    let degraded = matcher
        .rank(&reference, candidates.clone(), &reviews, &remote, 10)
        .await;
    let lexical = matcher
        .rank(&reference, candidates, &reviews, &LexicalSentiment, 10)
        .await;

    assert_eq!(degraded.results.len(), lexical.results.len());
    for (d, l) in degraded.results.iter().zip(lexical.results.iter()) {
        assert_eq!(d.dog_id, l.dog_id);
        assert!((d.compatibility_score - l.compatibility_score).abs() < 1e-12);
        assert!((d.sentiment_score - l.sentiment_score).abs() < 1e-12);
    }
}

#[tokio::test]
async fn test_remote_sentiment_success_changes_the_scores() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/sentiment")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"averageSentiment": 0.9}"#)
        .create_async()
        .await;

    let remote = RemoteSentiment::new(format!("{}/api/sentiment", server.url()), 5);

    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let candidates = vec![create_dog("a", "MA", 3, 65, 4)];
    let reviews = InMemoryReviews::new()
        .with_reviews("ref", &PRAISE, 5)
        .with_reviews("a", &PRAISE, 5);

    let enriched = matcher
        .rank(&reference, candidates, &reviews, &remote, 10)
        .await;

    assert_eq!(enriched.results[0].sentiment_score, 0.9);
}

#[tokio::test]
async fn test_empty_candidate_set_returns_empty_list() {
    let matcher = Matcher::with_defaults();
    let reference = create_dog("ref", "MA", 3, 65, 4);
    let reviews = InMemoryReviews::new();

    let result = matcher
        .rank(&reference, vec![], &reviews, &LexicalSentiment, 10)
        .await;

    assert!(result.results.is_empty());
    assert_eq!(result.total_candidates, 0);
}
