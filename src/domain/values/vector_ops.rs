//! Vector arithmetic shared by the stores and the query builder.
//! Vectors are f32 on the wire; all accumulation happens in f64 so that
//! scores stay stable for high-dimensional inputs.

pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum()
}

pub fn norm(v: &[f32]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale to unit Euclidean norm. Returns `None` for a zero vector, whose
/// direction (and therefore cosine similarity) is undefined.
pub fn normalize(v: &[f32]) -> Option<Vec<f32>> {
    let n = norm(v);
    if n == 0.0 {
        return None;
    }
    Some(v.iter().map(|x| (*x as f64 / n) as f32).collect())
}

/// Dot product of an already-normalized query against a stored vector of
/// unknown norm, re-normalizing the stored side on the fly. Returns `None`
/// when the lengths differ or the stored vector has zero norm.
pub fn normalized_dot(unit_query: &[f32], stored: &[f32]) -> Option<f64> {
    if unit_query.len() != stored.len() {
        return None;
    }
    let mut dot = 0.0_f64;
    let mut norm_sq = 0.0_f64;
    for (q, s) in unit_query.iter().zip(stored.iter()) {
        let q = *q as f64;
        let s = *s as f64;
        dot += q * s;
        norm_sq += s * s;
    }
    let n = norm_sq.sqrt();
    if n == 0.0 {
        None
    } else {
        Some(dot / n)
    }
}

/// Cosine similarity with both sides re-normalized. Mismatched or zero-norm
/// inputs score 0.0. The result is not clamped: genuinely opposed vectors
/// score negative.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// `weight_a * a + (1 - weight_a) * b`, accumulated in f64. Truncates to the
/// shorter input; callers are expected to pass equal-length vectors.
pub fn combine_weighted(a: &[f32], b: &[f32], weight_a: f64) -> Vec<f32> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (weight_a * *x as f64 + (1.0 - weight_a) * *y as f64) as f32)
        .collect()
}
