//! Deterministic hash embeddings for semantic search.
//!
//! Feature hashing over whitespace tokens into a fixed 384-dim vector,
//! L2-normalized. No model, no network: the same text always embeds to
//! the same vector, which is all the chunk search needs.

use migmap_common::hash::sha256_digest;

/// Embedding dimensionality.
pub const EMBED_DIM: usize = 384;

/// Input is truncated to this many bytes before embedding.
const MAX_EMBED_BYTES: usize = 12_000;

/// Embed a text chunk into a normalized vector.
///
/// Blank input yields the zero vector.
pub fn embed_text(text: &str) -> Vec<f64> {
    let mut vec = vec![0.0f64; EMBED_DIM];
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return vec;
    }

    let bounded = truncate_utf8(trimmed, MAX_EMBED_BYTES);
    for token in bounded.split_whitespace() {
        let digest = sha256_digest(&token.to_lowercase());
        let bucket = u64::from_be_bytes(digest[0..8].try_into().unwrap_or([0; 8]));
        let idx = (bucket % EMBED_DIM as u64) as usize;
        // Low bit of the next digest byte decides the sign.
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vec[idx] += sign;
    }

    let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in &mut vec {
            *v /= norm;
        }
    }
    vec
}

/// Cosine similarity; 0.0 for empty or mismatched vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|y| y * y).sum::<f64>().sqrt();
    let na = if na == 0.0 { 1.0 } else { na };
    let nb = if nb == 0.0 { 1.0 } else { nb };
    dot / (na * nb)
}

fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_zero_vector() {
        for text in ["", "   ", "\n\t"] {
            let v = embed_text(text);
            assert_eq!(v.len(), EMBED_DIM);
            assert!(v.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let a = embed_text("kafka consumer with dead letter queue");
        let b = embed_text("kafka consumer with dead letter queue");
        assert_eq!(a, b);
    }

    #[test]
    fn test_embedding_is_normalized() {
        let v = embed_text("terraform plan for the billing service");
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_bounds_and_self_similarity() {
        let a = embed_text("postgres flyway migration scripts");
        let b = embed_text("jenkins pipeline for deployment");
        let sim = cosine_similarity(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_rejects_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let zero = vec![0.0; EMBED_DIM];
        let v = embed_text("anything");
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
    }

    #[test]
    fn test_long_input_truncates_on_char_boundary() {
        let text = "é".repeat(10_000);
        let v = embed_text(&text);
        assert_eq!(v.len(), EMBED_DIM);
    }
}
