use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

/// Compute cosine similarity between two score vectors
///
/// Formula: cos(A, B) = (A · B) / (||A|| × ||B||)
///
/// Returns `0.0` when the vectors differ in length or either norm is zero.
/// Callers feed non-negative engagement scores, so the effective range is [0, 1].
pub fn cosine_similarity(vec_a: &[f64], vec_b: &[f64]) -> f64 {
    if vec_a.len() != vec_b.len() {
        return 0.0;
    }

    let dot_product: f64 = vec_a.iter().zip(vec_b.iter()).map(|(a, b)| a * b).sum();
    let norm_a: f64 = vec_a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = vec_b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Compute Jaccard similarity |A ∩ B| / |A ∪ B| between two sets
///
/// Returns `0.0` when either set is empty.
pub fn jaccard_similarity<T, S>(set_a: &HashSet<T, S>, set_b: &HashSet<T, S>) -> f64
where
    T: Eq + Hash,
    S: BuildHasher,
{
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.iter().filter(|item| set_b.contains(*item)).count();
    let union = set_a.len() + set_b.len() - intersection;

    intersection as f64 / union as f64
}
