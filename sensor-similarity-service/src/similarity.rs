//! Cosine-similarity scoring over the stored readings.
//!
//! Every query is a linear scan — no index, no precomputed norms. The
//! target datasets are small enough that O(n·d) per query is fine.

use sensor_similarity_types::SensorReading;

/// Maximum number of hits a query returns.
pub const TOP_K: usize = 5;

/// Cosine similarity between two vectors (1 − cosine distance),
/// higher = more similar. Mismatched lengths or a zero-magnitude
/// vector score 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a < f64::EPSILON || norm_b < f64::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every reading against `query_vec` and return the top matches,
/// highest similarity first. Ties keep store order (stable sort).
pub fn rank(readings: Vec<SensorReading>, query_vec: &[f64]) -> Vec<(SensorReading, f64)> {
    let mut scored: Vec<(SensorReading, f64)> = readings
        .into_iter()
        .map(|r| {
            let sim = cosine_similarity(query_vec, &r.vector());
            (r, sim)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(TOP_K);
    scored
}
