//! Weighted focal/context query construction.

mod common;

use common::{setup_counted, setup_static};
use semvault::domain::error::DomainError;
use semvault::domain::values::focal_weight::FocalWeight;
use semvault::domain::values::vector_ops;

#[tokio::test]
async fn test_full_focal_weight_matches_plain_query_embedding() {
    let (vault, _) = setup_counted();

    let plain = vault.embed_query("rust ownership").await.unwrap();
    let weighted = vault
        .embed_with_context(
            "rust ownership",
            Some("a chapter about memory"),
            FocalWeight::new(1.0).unwrap(),
        )
        .await
        .unwrap();

    let sim = vector_ops::cosine_similarity(&plain, &weighted);
    assert!(sim > 0.9999, "weight 1.0 should ignore context, sim={sim}");
}

#[tokio::test]
async fn test_combined_vector_is_unit_norm() {
    let (vault, _) = setup_counted();

    let v = vault
        .embed_with_context("borrow checker", Some("compiler internals"), FocalWeight::default())
        .await
        .unwrap();

    assert!((vector_ops::norm(&v) - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_empty_context_falls_back_to_plain_embedding() {
    let (vault, provider) = setup_counted();

    let with_empty = vault
        .embed_with_context("query text", Some(""), FocalWeight::default())
        .await
        .unwrap();
    let with_none = vault
        .embed_with_context("query text", None, FocalWeight::default())
        .await
        .unwrap();
    let plain = vault.embed_query("query text").await.unwrap();

    assert_eq!(with_empty, plain);
    assert_eq!(with_none, plain);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_focal_and_context_embedded_in_one_call() {
    let (vault, provider) = setup_counted();

    vault
        .embed_with_context("focal", Some("context"), FocalWeight::default())
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_context_pulls_vector_toward_it() {
    let vault = setup_static(
        2,
        vec![("focal", vec![1.0, 0.0]), ("context", vec![0.0, 1.0])],
    );

    let v = vault
        .embed_with_context("focal", Some("context"), FocalWeight::new(0.7).unwrap())
        .await
        .unwrap();

    // normalize(0.7 * [1,0] + 0.3 * [0,1])
    let expected_x = 0.7 / (0.58_f64).sqrt();
    let expected_y = 0.3 / (0.58_f64).sqrt();
    assert!((v[0] as f64 - expected_x).abs() < 1e-4);
    assert!((v[1] as f64 - expected_y).abs() < 1e-4);
}

#[tokio::test]
async fn test_cancelling_focal_and_context_is_an_error() {
    let vault = setup_static(
        2,
        vec![("up", vec![1.0, 0.0]), ("down", vec![-1.0, 0.0])],
    );

    let err = vault
        .embed_with_context("up", Some("down"), FocalWeight::new(0.5).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)), "{err}");
}

#[tokio::test]
async fn test_embed_chunked_windows_text_with_one_call() {
    let (vault, provider) = setup_counted();

    // Step 2 over ten words: [0..4], [2..6], [4..8], [6..10], [8..10]
    let text = "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9";
    let vectors = vault.embed_chunked(text, 4, 2).await.unwrap();

    assert_eq!(vectors.len(), 5);
    for v in &vectors {
        assert!((vector_ops::norm(v) - 1.0).abs() < 1e-4);
    }
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_embed_chunked_short_text_is_one_chunk() {
    let (vault, _) = setup_counted();

    let vectors = vault.embed_chunked("just three words", 256, 50).await.unwrap();
    assert_eq!(vectors.len(), 1);
}

#[tokio::test]
async fn test_embed_chunked_rejects_bad_window_parameters() {
    let (vault, _) = setup_counted();

    let err = vault.embed_chunked("text", 0, 0).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)), "{err}");

    let err = vault.embed_chunked("text", 4, 4).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)), "{err}");
}

#[test]
fn test_focal_weight_bounds() {
    assert!(FocalWeight::new(0.0).is_ok());
    assert!(FocalWeight::new(1.0).is_ok());
    assert!(FocalWeight::new(-0.1).is_err());
    assert!(FocalWeight::new(1.1).is_err());
}
