use clap::Parser;
use semvault::cli::commands::{Cli, Commands};
use semvault::domain::entities::embed_result::DocumentInput;
use semvault::domain::entities::embedding_record::Metadata;
use semvault::domain::entities::related::{RelatedContentOptions, Selection};
use semvault::domain::values::focal_weight::FocalWeight;
use semvault::SemVault;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "semvault=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("SEMVAULT_DB").unwrap_or_else(|_| "./semvault.db".into());
    let dimension = std::env::var("SEMVAULT_DIMENSION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(semvault::DEFAULT_DIMENSION);

    let vault = match SemVault::open(&db_path, dimension) {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("Error opening vault: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(vault, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(vault: SemVault, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Embed {
            content,
            id,
            metadata,
            force,
        } => {
            let document_id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let metadata = parse_json_object(&metadata)?;
            let result = if force {
                vault.embed_document(&document_id, &content, metadata).await?
            } else {
                vault.embed_if_changed(&document_id, &content, metadata).await?
            };
            let mut out = serde_json::to_value(&result)?;
            strip_vector(&mut out);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::EmbedBatch { json, force } => {
            let documents: Vec<DocumentInput> = serde_json::from_str(&json)?;
            let result = vault.embed_batch(documents, !force).await?;
            let mut out = serde_json::to_value(&result)?;
            if let Some(results) = out.get_mut("results").and_then(|v| v.as_array_mut()) {
                for r in results {
                    strip_vector(r);
                }
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::EmbedChunked {
            text,
            chunk_size,
            overlap,
            vectors,
        } => {
            let embedded = vault.embed_chunked(&text, chunk_size, overlap).await?;
            let dimension = embedded.first().map(|v| v.len()).unwrap_or(0);
            let mut out = serde_json::json!({
                "chunks": embedded.len(),
                "dimension": dimension,
            });
            if vectors {
                if let Some(obj) = out.as_object_mut() {
                    obj.insert("vectors".to_string(), serde_json::to_value(&embedded)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Search {
            query,
            top_k,
            threshold,
            filter,
        } => {
            let filter = parse_json_object(&filter)?;
            let results = vault.search_text(&query, top_k, threshold, filter).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Related {
            text,
            context,
            source,
            top_k,
            threshold,
            focal_weight,
            doc_type,
            exclude,
        } => {
            let selection = Selection {
                text,
                context,
                source_document_id: source,
            };
            let options = RelatedContentOptions {
                top_k,
                threshold,
                focal_weight: FocalWeight::new(focal_weight).map_err(|e: String| e)?,
                document_type: doc_type,
                exclude_ids: exclude,
            };
            let result = vault.find_related(&selection, &options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::RelatedByType {
            text,
            context,
            source,
            per_type,
            threshold,
            types,
        } => {
            let selection = Selection {
                text,
                context,
                source_document_id: source,
            };
            let types = if types.is_empty() { None } else { Some(types) };
            let groups = vault
                .find_related_grouped_by_type(&selection, per_type, threshold, types)
                .await?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::SuggestLinks {
            text,
            context,
            source,
            max_suggestions,
            min_score,
        } => {
            let selection = Selection {
                text,
                context,
                source_document_id: source,
            };
            let links = vault
                .suggest_links(&selection, max_suggestions, min_score)
                .await?;
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        Commands::Mentions {
            entity,
            entity_type,
            source,
            top_k,
        } => {
            let mentions = vault
                .find_mentions(&entity, entity_type.as_deref(), source.as_deref(), top_k)
                .await?;
            println!("{}", serde_json::to_string_pretty(&mentions)?);
        }
        Commands::Similar {
            id,
            top_k,
            threshold,
            include_self,
            filter,
        } => {
            let filter = parse_json_object(&filter)?;
            let result =
                vault.find_similar_documents(&id, top_k, threshold, !include_self, filter)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::SimilarText {
            text,
            top_k,
            threshold,
            filter,
        } => {
            let filter = parse_json_object(&filter)?;
            let result = vault
                .find_similar_by_text(&text, top_k, threshold, filter)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Pairwise { id1, id2 } => {
            let score = vault.pairwise_similarity(&id1, &id2)?;
            println!("{score}");
        }
        Commands::TextSimilarity { text1, text2 } => {
            let score = vault.text_similarity(&text1, &text2).await?;
            println!("{score}");
        }
        Commands::Recommend {
            recent,
            top_k,
            exclude,
        } => {
            let recommendations = vault.recommendations_for_user(&recent, top_k, &exclude)?;
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
        }
        Commands::Get { id, vector } => {
            let record = vault
                .get_embedding(&id)?
                .ok_or_else(|| format!("Not found: {id}"))?;
            let mut out = serde_json::to_value(&record)?;
            if !vector {
                if let Some(obj) = out.as_object_mut() {
                    let dim = obj
                        .remove("vector")
                        .and_then(|v| v.as_array().map(|a| a.len()))
                        .unwrap_or(0);
                    obj.insert("dimension".to_string(), serde_json::json!(dim));
                }
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Delete { id } => {
            if vault.delete_embedding(&id)? {
                println!("Deleted {id}");
            } else {
                println!("Not found: {id}");
            }
        }
        Commands::Count => {
            println!("{}", vault.count()?);
        }
        Commands::Clear => {
            let count = vault.count()?;
            vault.clear()?;
            println!("Cleared {count} embeddings");
        }
    }
    Ok(())
}

fn parse_json_object(s: &Option<String>) -> Result<Option<Metadata>, Box<dyn std::error::Error>> {
    match s {
        None => Ok(None),
        Some(s) => match serde_json::from_str(s)? {
            serde_json::Value::Object(map) => Ok(Some(map)),
            _ => Err("Expected a JSON object".into()),
        },
    }
}

/// Vectors are long and rarely useful on a terminal.
fn strip_vector(value: &mut serde_json::Value) {
    if let Some(obj) = value.as_object_mut() {
        obj.remove("vector");
    }
}
