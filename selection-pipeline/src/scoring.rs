/// Cosine similarity between two vectors.
///
/// Defined as 0.0 (not NaN) when either vector has zero norm, so a
/// degenerate embedding can never poison a selection decision.
pub fn cosine_similarity(u: &[f32], v: &[f32]) -> f32 {
    debug_assert_eq!(u.len(), v.len(), "embedding dimensions must match");

    let dot: f32 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let norm_u = u.iter().map(|a| a * a).sum::<f32>().sqrt();
    let norm_v = v.iter().map(|b| b * b).sum::<f32>().sqrt();

    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }

    dot / (norm_u * norm_v)
}
