// Core algorithm exports
pub mod embedding;
pub mod matcher;
pub mod scoring;
pub mod sentiment;
pub mod similarity;

pub use embedding::{SociabilityScale, TraitEmbedder, EMBEDDING_DIM};
pub use matcher::{FetchError, Matcher, RankResult, ReviewSource};
pub use scoring::{compatibility_score, is_compatible, DEFAULT_COMPATIBILITY_THRESHOLD, DEFAULT_SMOOTHING_K};
pub use sentiment::{lexical_sentiment, score_comment, LexicalSentiment, SentimentBackend};
pub use similarity::cosine_similarity;
