use crate::application::context_query::ContextualQueryBuilder;
use crate::domain::entities::embedding_record::Metadata;
use crate::domain::entities::related::{
    default_document_types, RelatedContentOptions, RelatedContentResult, RelatedDocument,
    Selection,
};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use crate::domain::values::focal_weight::FocalWeight;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// "Highlight to discover": turns a highlighted selection into a weighted
/// query vector and ranks related documents, with post-retrieval exclusion
/// of the source document and any caller-named ids.
pub struct RelatedContentUseCase {
    store: Arc<dyn EmbeddingStore>,
    query_builder: ContextualQueryBuilder,
}

impl RelatedContentUseCase {
    pub fn new(store: Arc<dyn EmbeddingStore>, query_builder: ContextualQueryBuilder) -> Self {
        Self {
            store,
            query_builder,
        }
    }

    pub async fn find_related(
        &self,
        selection: &Selection,
        options: &RelatedContentOptions,
    ) -> Result<RelatedContentResult, DomainError> {
        let mut exclude: HashSet<String> = options.exclude_ids.iter().cloned().collect();
        if let Some(source) = &selection.source_document_id {
            exclude.insert(source.clone());
        }

        let query_vector = self
            .query_builder
            .embed_with_context(
                &selection.text,
                selection.context.as_deref(),
                options.focal_weight,
            )
            .await?;
        let query_dimension = query_vector.len();

        let filter = options.document_type.as_ref().map(|doc_type| {
            let mut m = Metadata::new();
            m.insert(
                "document_type".to_string(),
                serde_json::Value::String(doc_type.clone()),
            );
            m
        });

        // Exclusions are applied after retrieval, so fetch extra candidates
        // to leave top_k survivors when possible.
        let hits = self.store.search(&SearchQuery {
            vector: query_vector,
            top_k: options.top_k + exclude.len(),
            threshold: options.threshold,
            filter,
            include_vectors: false,
        })?;

        let mut related_documents = Vec::new();
        for hit in hits {
            if exclude.contains(&hit.document_id) {
                continue;
            }
            related_documents.push(RelatedDocument::from_search(hit));
            if related_documents.len() >= options.top_k {
                break;
            }
        }

        debug!(
            highlight_length = selection.text.len(),
            results = related_documents.len(),
            "Found related content"
        );

        Ok(RelatedContentResult {
            highlighted_text: selection.text.clone(),
            context: selection.context.clone(),
            related_documents,
            query_dimension,
            total_searched: self.store.count()?,
        })
    }

    /// One independent query per document type; groups keep the requested
    /// order and are not ranked against each other.
    pub async fn find_related_grouped_by_type(
        &self,
        selection: &Selection,
        top_k_per_type: usize,
        threshold: f64,
        document_types: Option<Vec<String>>,
    ) -> Result<Vec<(String, Vec<RelatedDocument>)>, DomainError> {
        let types = document_types.unwrap_or_else(default_document_types);
        let mut grouped = Vec::with_capacity(types.len());
        for doc_type in types {
            let options = RelatedContentOptions {
                top_k: top_k_per_type,
                threshold,
                document_type: Some(doc_type.clone()),
                ..RelatedContentOptions::default()
            };
            let result = self.find_related(selection, &options).await?;
            grouped.push((doc_type, result.related_documents));
        }
        Ok(grouped)
    }

    /// Link candidates for the selection. Stricter minimum score than
    /// general related content, and weighted further toward the literal
    /// highlighted text.
    pub async fn suggest_links(
        &self,
        selection: &Selection,
        max_suggestions: usize,
        min_score: f64,
    ) -> Result<Vec<RelatedDocument>, DomainError> {
        let options = RelatedContentOptions {
            top_k: max_suggestions,
            threshold: min_score,
            focal_weight: FocalWeight::LINK,
            ..RelatedContentOptions::default()
        };
        let result = self.find_related(selection, &options).await?;
        Ok(result.related_documents)
    }

    /// Documents mentioning a named entity. Context is ignored entirely so
    /// the literal entity text drives the match. When an `entity_type`
    /// post-filter would empty the result list, the unfiltered list is
    /// returned instead.
    pub async fn find_mentions(
        &self,
        entity_text: &str,
        entity_type: Option<&str>,
        source_document_id: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<RelatedDocument>, DomainError> {
        let selection = Selection {
            text: entity_text.to_string(),
            context: None,
            source_document_id: source_document_id.map(str::to_string),
        };
        let options = RelatedContentOptions {
            top_k,
            threshold: 0.6,
            focal_weight: FocalWeight::EXACT,
            ..RelatedContentOptions::default()
        };
        let result = self.find_related(&selection, &options).await?;
        let mut documents = result.related_documents;

        if let Some(entity_type) = entity_type {
            let any_tagged = documents
                .iter()
                .any(|doc| has_entity_type(&doc.metadata, entity_type));
            if any_tagged {
                documents.retain(|doc| has_entity_type(&doc.metadata, entity_type));
            } else {
                debug!(
                    entity_type,
                    "No mention carries the entity type, returning unfiltered results"
                );
            }
        }
        Ok(documents)
    }
}

/// True when `metadata.entity_types[entity_type]` holds a truthy value:
/// a non-false bool, non-zero number, or non-empty string/array/object.
fn has_entity_type(metadata: &Metadata, entity_type: &str) -> bool {
    metadata
        .get("entity_types")
        .and_then(|v| v.as_object())
        .and_then(|types| types.get(entity_type))
        .map(is_truthy)
        .unwrap_or(false)
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}
