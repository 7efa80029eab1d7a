//! Similarity scores for embedding vectors

use atlas_rag_kernel::rag::SimilarityMetric;

/// Score two embedding vectors with the given metric, higher meaning more
/// similar.
///
/// Euclidean distance is mapped through 1 / (1 + distance) so that
/// identical vectors score 1.0 under both cosine and euclidean.
pub fn compute_similarity(a: &[f32], b: &[f32], metric: SimilarityMetric) -> f32 {
    match metric {
        SimilarityMetric::Cosine => cosine_similarity(a, b),
        SimilarityMetric::Euclidean => 1.0 / (1.0 + euclidean_distance(a, b)),
        SimilarityMetric::DotProduct => dot_product(a, b),
    }
}

/// Cosine similarity in [-1.0, 1.0]; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
