//! Command-line adapter: load `.txt` documents, chunk, embed, and query them.
//!
//! Every run builds the store in memory from `--path`; nothing is persisted.

mod config;

pub use config::{EmbeddingConfig, RetrievalConfig, SearchConfig};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use retrieval_text_chunker::{Chunker, SplitMode, TextFileLoader, SOURCE_KEY};
use retrieval_vector_store::{
    HashEmbedder, MetadataFilter, SearchOutput, SpawnBlocking, VectorStore,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "retrieval")]
#[command(about = "In-memory dense vector retrieval over text files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config with [chunker], [search] and [embedding] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    overrides: Overrides,
}

/// Flags that take precedence over the config file
#[derive(Args, Default)]
struct Overrides {
    /// Maximum chunk length in characters
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Characters shared between consecutive chunks
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    /// character | paragraph
    #[arg(long, global = true)]
    split_mode: Option<String>,

    /// Embedding dimension for the hashing embedder
    #[arg(long, global = true)]
    dimension: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank chunks of the documents under --path against a query
    Query(QueryArgs),

    /// List the distinct document sources that produced chunks
    Sources(SourcesArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// A .txt file or a directory of them
    #[arg(long)]
    path: PathBuf,

    /// Query text
    #[arg(long)]
    query: String,

    /// Number of results
    #[arg(short, long)]
    k: Option<usize>,

    /// pearson | cosine
    #[arg(long)]
    metric: Option<String>,

    /// Required metadata match, e.g. source=lear.txt (repeatable)
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    filters: Vec<String>,

    /// Print only the ranked chunk texts
    #[arg(long)]
    text_only: bool,

    /// Emit JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SourcesArgs {
    /// A .txt file or a directory of them
    #[arg(long)]
    path: PathBuf,
}

/// Entry point shared by the `retrieval` binary
pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = RetrievalConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli.overrides)?;

    match cli.command {
        Commands::Query(args) => run_query(&mut config, args).await,
        Commands::Sources(args) => run_sources(&config, args).await,
    }
}

fn apply_overrides(config: &mut RetrievalConfig, overrides: &Overrides) -> Result<()> {
    if let Some(size) = overrides.chunk_size {
        config.chunker.chunk_size = size;
    }
    if let Some(overlap) = overrides.chunk_overlap {
        config.chunker.chunk_overlap = overlap;
    }
    if let Some(mode) = &overrides.split_mode {
        config.chunker.split_mode = mode.parse::<SplitMode>()?;
    }
    if let Some(dimension) = overrides.dimension {
        config.embedding.dimension = dimension;
    }
    Ok(())
}

async fn build_store(config: &RetrievalConfig, path: &Path) -> Result<VectorStore> {
    config.validate()?;

    let documents = TextFileLoader::new(path)
        .load_documents()
        .with_context(|| format!("Failed to load documents from {}", path.display()))?;
    let chunker = Chunker::new(config.chunker.clone())?;
    let chunks = chunker.chunk_documents(&documents);

    let embedder = Arc::new(SpawnBlocking::new(HashEmbedder::new(
        config.embedding.dimension,
    )));
    VectorStore::build_from_chunks(chunks, embedder)
        .await
        .context("Failed to build vector store")
}

fn parse_filters(raw: &[String]) -> Result<Option<MetadataFilter>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut filter = MetadataFilter::new();
    for item in raw {
        let (field, value) = item
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid filter '{item}' (expected FIELD=VALUE)"))?;
        filter = filter.field(field.trim(), value.trim());
    }
    Ok(Some(filter))
}

async fn run_query(config: &mut RetrievalConfig, args: QueryArgs) -> Result<()> {
    if let Some(k) = args.k {
        config.search.k = k;
    }
    if let Some(metric) = args.metric {
        config.search.metric = metric;
    }
    let metric = config.metric()?;
    let filter = parse_filters(&args.filters)?;

    let store = build_store(config, &args.path).await?;
    let output = store
        .search_by_text(
            &args.query,
            config.search.k,
            &metric,
            args.text_only,
            filter.as_ref(),
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match output {
        SearchOutput::Texts(texts) => {
            for text in texts {
                println!("{text}");
            }
        }
        SearchOutput::Results(results) => {
            for result in results {
                let source = result
                    .metadata
                    .get(SOURCE_KEY)
                    .map_or("-", String::as_str);
                println!("{:.4}\t{source}\t{}", result.score, result.key);
            }
        }
    }
    Ok(())
}

async fn run_sources(config: &RetrievalConfig, args: SourcesArgs) -> Result<()> {
    let store = build_store(config, &args.path).await?;
    let sources: BTreeSet<String> = store
        .get_unique_metadata_values(SOURCE_KEY)
        .into_iter()
        .collect();
    for source in sources {
        println!("{source}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        assert!(parse_filters(&[]).unwrap().is_none());

        let filter = parse_filters(&["source = a.txt".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(filter, MetadataFilter::new().field("source", "a.txt"));

        assert!(parse_filters(&["source".to_string()]).is_err());
    }

    #[test]
    fn test_overrides_replace_config() {
        let mut config = RetrievalConfig::default();
        let overrides = Overrides {
            chunk_size: Some(50),
            chunk_overlap: Some(5),
            split_mode: Some("paragraph".to_string()),
            dimension: Some(16),
        };
        apply_overrides(&mut config, &overrides).unwrap();

        assert_eq!(config.chunker.chunk_size, 50);
        assert_eq!(config.chunker.chunk_overlap, 5);
        assert_eq!(config.chunker.split_mode, SplitMode::Paragraph);
        assert_eq!(config.embedding.dimension, 16);

        let bad = Overrides {
            split_mode: Some("sentences".to_string()),
            ..Overrides::default()
        };
        assert!(apply_overrides(&mut config, &bad).is_err());
    }
}
