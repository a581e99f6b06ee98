//! Highlight-to-discover queries: exclusion, typed filtering, grouping,
//! link suggestions, and entity mentions.

mod common;

use common::{meta, setup_static};
use semvault::domain::entities::related::{RelatedContentOptions, Selection};
use semvault::SemVault;
use serde_json::json;

const D: usize = 4;

/// Vault whose embedder maps "highlight" to the x axis, with a spread of
/// documents at known angles to it.
fn vault_with_corpus() -> SemVault {
    let vault = setup_static(D, vec![("highlight", vec![1.0, 0.0, 0.0, 0.0])]);

    // Scores against the query: close 0.99, mid 0.80, edge 0.65,
    // weak 0.55, far 0.29.
    let docs: Vec<(&str, Vec<f32>, &str)> = vec![
        ("src", vec![1.0, 0.0, 0.0, 0.0], "note"),
        ("close", vec![0.9, 0.1, 0.0, 0.0], "note"),
        ("mid", vec![0.8, 0.6, 0.0, 0.0], "email"),
        ("edge", vec![0.65, 0.76, 0.0, 0.0], "documentation"),
        ("weak", vec![0.55, 0.84, 0.0, 0.0], "task"),
        ("far", vec![0.3, 1.0, 0.0, 0.0], "task"),
    ];
    for (id, vector, doc_type) in docs {
        vault
            .put(
                id,
                &vector,
                meta(&[
                    ("title", json!(format!("Title of {id}"))),
                    ("document_type", json!(doc_type)),
                    ("snippet", json!(format!("Snippet of {id}"))),
                ]),
            )
            .unwrap();
    }
    vault
}

fn selection_from_src() -> Selection {
    Selection {
        text: "highlight".to_string(),
        context: None,
        source_document_id: Some("src".to_string()),
    }
}

#[tokio::test]
async fn test_find_related_excludes_source_document() {
    let vault = vault_with_corpus();

    let result = vault
        .find_related(&selection_from_src(), &RelatedContentOptions::default())
        .await
        .unwrap();

    let ids: Vec<&str> = result
        .related_documents
        .iter()
        .map(|d| d.document_id.as_str())
        .collect();
    assert!(!ids.contains(&"src"), "source must never be returned");
    assert_eq!(
        ids,
        vec!["close", "mid", "edge", "weak"],
        "ordered by score, threshold 0.5"
    );
}

#[tokio::test]
async fn test_find_related_excludes_caller_listed_ids() {
    let vault = vault_with_corpus();

    let options = RelatedContentOptions {
        exclude_ids: vec!["close".to_string(), "mid".to_string()],
        ..RelatedContentOptions::default()
    };
    let result = vault
        .find_related(&selection_from_src(), &options)
        .await
        .unwrap();

    let ids: Vec<&str> = result
        .related_documents
        .iter()
        .map(|d| d.document_id.as_str())
        .collect();
    assert_eq!(ids, vec!["edge", "weak"]);
}

#[tokio::test]
async fn test_find_related_fills_top_k_despite_exclusions() {
    let vault = setup_static(D, vec![("highlight", vec![1.0, 0.0, 0.0, 0.0])]);
    for i in 0..6 {
        let id = format!("doc-{i}");
        vault.put(&id, &[1.0, 0.1 * i as f32, 0.0, 0.0], meta(&[])).unwrap();
    }

    let selection = Selection {
        text: "highlight".to_string(),
        context: None,
        source_document_id: Some("doc-0".to_string()),
    };
    let options = RelatedContentOptions {
        top_k: 3,
        exclude_ids: vec!["doc-1".to_string()],
        ..RelatedContentOptions::default()
    };
    let result = vault.find_related(&selection, &options).await.unwrap();

    assert_eq!(
        result.related_documents.len(),
        3,
        "exclusion must not shrink the page below top_k"
    );
    for doc in &result.related_documents {
        assert_ne!(doc.document_id, "doc-0");
        assert_ne!(doc.document_id, "doc-1");
    }
}

#[tokio::test]
async fn test_find_related_document_type_filter() {
    let vault = vault_with_corpus();

    let options = RelatedContentOptions {
        document_type: Some("email".to_string()),
        ..RelatedContentOptions::default()
    };
    let result = vault
        .find_related(&selection_from_src(), &options)
        .await
        .unwrap();

    assert_eq!(result.related_documents.len(), 1);
    assert_eq!(result.related_documents[0].document_id, "mid");
    assert_eq!(result.related_documents[0].document_type.as_deref(), Some("email"));
}

#[tokio::test]
async fn test_find_related_result_envelope() {
    let vault = setup_static(
        D,
        vec![
            ("highlight", vec![1.0, 0.0, 0.0, 0.0]),
            ("surrounding paragraph", vec![0.0, 1.0, 0.0, 0.0]),
        ],
    );
    vault.put("a", &[1.0, 0.2, 0.0, 0.0], meta(&[])).unwrap();

    let selection = Selection {
        text: "highlight".to_string(),
        context: Some("surrounding paragraph".to_string()),
        source_document_id: None,
    };
    let result = vault
        .find_related(&selection, &RelatedContentOptions::default())
        .await
        .unwrap();

    assert_eq!(result.highlighted_text, "highlight");
    assert_eq!(result.context.as_deref(), Some("surrounding paragraph"));
    assert_eq!(result.query_dimension, D);
    assert_eq!(result.total_searched, 1);
    assert_eq!(result.related_documents.len(), 1);
}

#[tokio::test]
async fn test_related_document_display_fields_tolerate_absence() {
    let vault = setup_static(D, vec![("highlight", vec![1.0, 0.0, 0.0, 0.0])]);
    vault
        .put(
            "sparse",
            &[1.0, 0.0, 0.0, 0.0],
            meta(&[("title", json!("")), ("other", json!(42))]),
        )
        .unwrap();

    let result = vault
        .find_related(&Selection::new("highlight"), &RelatedContentOptions::default())
        .await
        .unwrap();

    let doc = &result.related_documents[0];
    assert_eq!(doc.title, None, "empty string counts as absent");
    assert_eq!(doc.document_type, None);
    assert_eq!(doc.snippet, None);
    assert_eq!(doc.metadata.get("other"), Some(&json!(42)));
}

#[tokio::test]
async fn test_grouped_by_type_defaults_and_caps() {
    let vault = setup_static(D, vec![("highlight", vec![1.0, 0.0, 0.0, 0.0])]);
    for i in 0..5 {
        let id = format!("note-{i}");
        vault
            .put(
                &id,
                &[1.0, 0.05 * i as f32, 0.0, 0.0],
                meta(&[("document_type", json!("note"))]),
            )
            .unwrap();
    }
    vault
        .put(
            "email-0",
            &[0.9, 0.1, 0.0, 0.0],
            meta(&[("document_type", json!("email"))]),
        )
        .unwrap();

    let groups = vault
        .find_related_grouped_by_type(&Selection::new("highlight"), 3, 0.5, None)
        .await
        .unwrap();

    let names: Vec<&str> = groups.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(names, vec!["note", "email", "documentation", "task"]);

    let notes = &groups[0].1;
    assert_eq!(notes.len(), 3, "capped at top_k_per_type");
    let emails = &groups[1].1;
    assert_eq!(emails.len(), 1);
    assert!(groups[2].1.is_empty());
    assert!(groups[3].1.is_empty());
}

#[tokio::test]
async fn test_grouped_by_type_honors_source_exclusion() {
    let vault = vault_with_corpus();

    let groups = vault
        .find_related_grouped_by_type(
            &selection_from_src(),
            5,
            0.0,
            Some(vec!["note".to_string()]),
        )
        .await
        .unwrap();

    let notes: Vec<&str> = groups[0].1.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(notes, vec!["close"], "src itself stays excluded");
}

#[tokio::test]
async fn test_suggest_links_applies_cap_and_min_score() {
    let vault = vault_with_corpus();

    let links = vault
        .suggest_links(&selection_from_src(), 5, 0.6)
        .await
        .unwrap();

    let ids: Vec<&str> = links.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(ids, vec!["close", "mid", "edge"], "far scores below 0.6");

    let capped = vault.suggest_links(&selection_from_src(), 2, 0.6).await.unwrap();
    assert_eq!(capped.len(), 2);
}

#[tokio::test]
async fn test_find_mentions_filters_by_entity_type() {
    let vault = setup_static(D, vec![("Acme Corp", vec![1.0, 0.0, 0.0, 0.0])]);
    vault
        .put(
            "tagged-org",
            &[1.0, 0.0, 0.0, 0.0],
            meta(&[("entity_types", json!({"ORG": true}))]),
        )
        .unwrap();
    vault
        .put(
            "tagged-person",
            &[0.95, 0.05, 0.0, 0.0],
            meta(&[("entity_types", json!({"PERSON": true}))]),
        )
        .unwrap();
    vault.put("untagged", &[0.9, 0.1, 0.0, 0.0], meta(&[])).unwrap();

    let mentions = vault
        .find_mentions("Acme Corp", Some("ORG"), None, 10)
        .await
        .unwrap();

    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].document_id, "tagged-org");
}

#[tokio::test]
async fn test_find_mentions_falls_back_when_no_document_is_tagged() {
    let vault = setup_static(D, vec![("Acme Corp", vec![1.0, 0.0, 0.0, 0.0])]);
    vault.put("a", &[1.0, 0.0, 0.0, 0.0], meta(&[])).unwrap();
    vault.put("b", &[0.9, 0.1, 0.0, 0.0], meta(&[])).unwrap();

    let mentions = vault
        .find_mentions("Acme Corp", Some("LOCATION"), None, 10)
        .await
        .unwrap();

    assert_eq!(mentions.len(), 2, "unfiltered results when the tag never appears");
}

#[tokio::test]
async fn test_find_mentions_respects_threshold_and_source() {
    let vault = setup_static(D, vec![("Acme Corp", vec![1.0, 0.0, 0.0, 0.0])]);
    vault.put("mentioning", &[1.0, 0.0, 0.0, 0.0], meta(&[])).unwrap();
    vault.put("unrelated", &[0.0, 1.0, 0.0, 0.0], meta(&[])).unwrap();
    vault.put("the-source", &[1.0, 0.0, 0.0, 0.0], meta(&[])).unwrap();

    let mentions = vault
        .find_mentions("Acme Corp", None, Some("the-source"), 10)
        .await
        .unwrap();

    let ids: Vec<&str> = mentions.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(ids, vec!["mentioning"]);
}
