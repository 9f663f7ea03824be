/// Cosine similarity between two trait vectors
///
/// Returns a value in [-1, 1]. Mismatched dimensionality and zero-magnitude
/// vectors both yield 0 ("incomparable") rather than an error so a ranking
/// pass can keep going for the remaining candidates.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Clamp to absorb floating-point drift
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
