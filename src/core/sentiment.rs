use async_trait::async_trait;

/// Words that nudge a review comment positive
pub const POSITIVE_WORDS: &[&str] = &[
    "amazing", "wonderful", "great", "excellent", "perfect", "friendly",
    "loving", "gentle", "smart", "playful", "energetic", "good", "nice",
    "recommend",
];

/// Words that nudge a review comment negative
pub const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "bad", "aggressive", "mean", "shy", "destructive", "loud",
    "untrained",
];

/// Maximum bonus awarded for exclamation marks
const EXCLAMATION_BONUS_CAP: f64 = 0.3;

/// Strategy seam for estimating review sentiment
///
/// Two implementations exist: the always-available lexical scorer below and
/// the remote estimator in `services::sentiment`, which silently degrades
/// to the lexical scorer on any failure. Callers never see which one
/// actually ran.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Aggregate polarity of a set of comments, in [-1, 1]; 0 when empty
    async fn estimate(&self, comments: &[String]) -> f64;
}

/// Keyword-list sentiment scoring, synchronous and dependency-free
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSentiment;

#[async_trait]
impl SentimentBackend for LexicalSentiment {
    async fn estimate(&self, comments: &[String]) -> f64 {
        lexical_sentiment(comments)
    }
}

/// Average lexical sentiment across comments; 0 for an empty list
pub fn lexical_sentiment(comments: &[String]) -> f64 {
    if comments.is_empty() {
        return 0.0;
    }

    let total: f64 = comments.iter().map(|c| score_comment(c)).sum();
    total / comments.len() as f64
}

/// Lexical polarity of one comment, clamped to [-1, 1]
///
/// Tokens are matched by substring so "recommended!" counts for
/// "recommend". Exclamation marks and capitalization add enthusiasm
/// bonuses on top of the word score.
pub fn score_comment(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let lowered = text.to_lowercase();
    let mut score = 0.0;

    for token in lowered.split_whitespace() {
        if POSITIVE_WORDS.iter().any(|w| token.contains(w)) {
            score += 0.1;
        }
        if NEGATIVE_WORDS.iter().any(|w| token.contains(w)) {
            score -= 0.1;
        }
    }

    let exclamations = text.matches('!').count() as f64;
    let uppercase = text.chars().filter(|c| c.is_ascii_uppercase()).count() as f64;
    let length = text.chars().count() as f64;

    score += (exclamations * 0.1).min(EXCLAMATION_BONUS_CAP);
    score += uppercase / length * 0.2;

    score.clamp(-1.0, 1.0)
}
