/// Default cutoff for the compatibility verdict
///
/// Deployments have run both 0.85 and 0.75; the value is configuration
/// (`scoring.threshold`), never inlined at call sites.
pub const DEFAULT_COMPATIBILITY_THRESHOLD: f64 = 0.85;

/// Default smoothing constant in the sentiment damping terms
pub const DEFAULT_SMOOTHING_K: f64 = 1.0;

/// Composite compatibility score
///
/// ```text
/// score = cos × ((s_self + 0.5·k) / (s_self + k)) × ((s_other + 3·k) / (s_other + 5·k))
/// ```
///
/// Both fractions rise monotonically with their sentiment input. At neutral
/// sentiment they evaluate to 0.5 and 0.6, so a perfect trait match with no
/// reviews lands at 0.3.
///
/// Sentiment inputs are bounded to [-1, 1]; with the default k both
/// denominators stay positive. Callers must not pick a k that zeroes either
/// denominator.
#[inline]
pub fn compatibility_score(
    cosine_sim: f64,
    sentiment_self: f64,
    sentiment_other: f64,
    k: f64,
) -> f64 {
    cosine_sim
        * ((sentiment_self + 0.5 * k) / (sentiment_self + k))
        * ((sentiment_other + 3.0 * k) / (sentiment_other + 5.0 * k))
}

/// Verdict: does a composite score clear the configured cutoff?
#[inline]
pub fn is_compatible(score: f64, threshold: f64) -> bool {
    score >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_sentiment_reduces_to_point_three() {
        // (0 + 0.5)/(0 + 1) = 0.5, (0 + 3)/(0 + 5) = 0.6
        let score = compatibility_score(1.0, 0.0, 0.0, 1.0);
        assert!((score - 0.3).abs() < 1e-9);

        let score = compatibility_score(0.9, 0.0, 0.0, 1.0);
        assert!((score - 0.27).abs() < 1e-9);
    }

    #[test]
    fn test_positive_sentiment_lifts_score() {
        let neutral = compatibility_score(0.9, 0.0, 0.0, 1.0);
        let glowing = compatibility_score(0.9, 1.0, 1.0, 1.0);
        assert!(glowing > neutral);
    }

    #[test]
    fn test_score_monotonic_in_each_sentiment() {
        for s in [-0.8, -0.3, 0.0, 0.4, 0.9] {
            assert!(compatibility_score(0.9, s, 0.0, 1.0) < compatibility_score(0.9, s + 0.1, 0.0, 1.0));
            assert!(compatibility_score(0.9, 0.0, s, 1.0) < compatibility_score(0.9, 0.0, s + 0.1, 1.0));
        }
    }

    #[test]
    fn test_fully_negative_self_sentiment_floors_the_score() {
        // At s_self = -0.5k the first damping term reaches zero
        let score = compatibility_score(1.0, -0.5, 1.0, 1.0);
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn test_verdict_threshold() {
        assert!(is_compatible(0.85, DEFAULT_COMPATIBILITY_THRESHOLD));
        assert!(!is_compatible(0.849, DEFAULT_COMPATIBILITY_THRESHOLD));
        // The historical lower cutoff is one config value away
        assert!(is_compatible(0.76, 0.75));
    }

    #[test]
    fn test_zero_similarity_zeroes_score() {
        let score = compatibility_score(0.0, 1.0, 1.0, 1.0);
        assert_eq!(score, 0.0);
    }
}
