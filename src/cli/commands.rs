use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "semvault", about = "Semantic embedding vault: store, search, relate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed a document and store its vector
    Embed {
        /// Document content to embed
        content: String,
        /// Document id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// JSON metadata object stored alongside the vector
        #[arg(long)]
        metadata: Option<String>,
        /// Re-embed even when the content fingerprint is unchanged
        #[arg(long)]
        force: bool,
    },
    /// Embed a batch of documents from a JSON array
    EmbedBatch {
        /// JSON array of {document_id, content, metadata}
        json: String,
        /// Re-embed unchanged documents too
        #[arg(long)]
        force: bool,
    },
    /// Embed a long text as overlapping word-window chunks
    EmbedChunked {
        text: String,
        /// Words per chunk
        #[arg(long, default_value = "256")]
        chunk_size: usize,
        /// Words shared by consecutive chunks
        #[arg(long, default_value = "50")]
        overlap: usize,
        /// Include the raw vectors in the output
        #[arg(long)]
        vectors: bool,
    },
    /// Semantic search over stored documents
    Search {
        query: String,
        #[arg(long, default_value = "10")]
        top_k: usize,
        #[arg(long, default_value = "0.0")]
        threshold: f64,
        /// JSON object; results must match every key exactly
        #[arg(long)]
        filter: Option<String>,
    },
    /// Find content related to a highlighted selection
    Related {
        /// Highlighted text
        text: String,
        /// Surrounding context
        #[arg(long)]
        context: Option<String>,
        /// Source document id, excluded from results
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "10")]
        top_k: usize,
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        /// Weight of the highlighted text against its context (0.0 to 1.0)
        #[arg(long, default_value = "0.7")]
        focal_weight: f64,
        /// Only return documents of this type
        #[arg(long)]
        doc_type: Option<String>,
        /// Document id to exclude (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Related content grouped by document type
    RelatedByType {
        text: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "3")]
        per_type: usize,
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        /// Document type to query (repeatable; defaults to note, email, documentation, task)
        #[arg(long = "type")]
        types: Vec<String>,
    },
    /// Suggest link targets for a highlighted selection
    SuggestLinks {
        text: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "5")]
        max_suggestions: usize,
        #[arg(long, default_value = "0.6")]
        min_score: f64,
    },
    /// Find documents mentioning an entity
    Mentions {
        entity: String,
        /// Keep only documents tagged with this entity type
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "20")]
        top_k: usize,
    },
    /// Documents similar to a stored document
    Similar {
        /// Document id
        id: String,
        #[arg(long, default_value = "10")]
        top_k: usize,
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        /// Keep the document itself in the results
        #[arg(long)]
        include_self: bool,
        /// JSON object; results must match every key exactly
        #[arg(long)]
        filter: Option<String>,
    },
    /// Documents similar to free text
    SimilarText {
        text: String,
        #[arg(long, default_value = "10")]
        top_k: usize,
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Cosine similarity between two stored documents
    Pairwise { id1: String, id2: String },
    /// Cosine similarity between two texts
    TextSimilarity { text1: String, text2: String },
    /// Recommend documents based on recently viewed ones
    Recommend {
        /// Recently viewed document ids, most recent first
        recent: Vec<String>,
        #[arg(long, default_value = "10")]
        top_k: usize,
        /// Document id to exclude (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Show a stored embedding record
    Get {
        id: String,
        /// Include the raw vector in the output
        #[arg(long)]
        vector: bool,
    },
    /// Delete a stored embedding
    Delete { id: String },
    /// Count stored embeddings
    Count,
    /// Delete all stored embeddings
    Clear,
}
