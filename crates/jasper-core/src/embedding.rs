//! Deterministic pseudo-embeddings.
//!
//! These vectors carry no semantic meaning: they exist so documents and
//! queries have a stable, reproducible vector representation (useful as
//! test fixtures and as a schema placeholder) until a real embedding
//! model is wired in behind the same `DocumentStore::search` contract.

pub const EMBEDDING_DIM: usize = 128;

/// 32-bit string hash (djb-style shift-and-subtract, wrapping).
fn simple_hash(s: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in s.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(ch as i32);
    }
    hash
}

/// Produce a deterministic 128-dimensional vector for `text`.
/// Same input always yields the same vector; values lie in [-1, 1].
pub fn embed(text: &str) -> Vec<f32> {
    let hash = simple_hash(&text.to_lowercase()) as f64;
    (0..EMBEDDING_DIM)
        .map(|i| {
            let value = (hash * (i as f64 + 1.0) * 0.01).sin() * (i as f64 * 0.05).cos();
            value as f32
        })
        .collect()
}

/// Cosine similarity between two equal-length vectors. Returns 0.0 for
/// zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut mag_a = 0.0f32;
    let mut mag_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let mag_a = mag_a.sqrt();
    let mag_b = mag_b.sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}
