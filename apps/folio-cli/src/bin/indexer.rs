use std::sync::Arc;

use clap::Parser;

use folio_cli::ConfigArgs;
use folio_core::document::load_document;
use folio_core::logging::init_tracing;
use folio_core::splitter::TextSplitter;
use folio_core::traits::{Embedder, VectorIndex};
use folio_embed::build_embedder;
use folio_index::CorpusIndexer;
use folio_responder::retrieve;

#[derive(Parser, Debug)]
#[command(name = "folio-index", about = "Split and index the résumé, optionally probing retrieval")]
struct IndexCli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print every chunk with its offset
    #[arg(long, default_value_t = false)]
    show_chunks: bool,

    /// Run a retrieval for this query against the fresh index
    #[arg(long)]
    search: Option<String>,

    /// Number of hits for --search (defaults to retrieval.top_k)
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = IndexCli::parse();
    let config = cli.config.load()?;
    let settings = config.settings()?;

    let resume_path = config.resolve_path(&settings.data.resume_path);
    let document = load_document(&resume_path)?;
    let embedder = build_embedder(&settings.embedding, &config.resolve_path(&settings.embedding.model_dir))?;
    let splitter = TextSplitter::new(settings.chunking.clone())?;
    let chunking = splitter.config().clone();
    let indexer = CorpusIndexer::new(splitter, Arc::clone(&embedder), settings.retrieval.metric);

    println!("Folio Indexer\n=============");
    println!("Document: {} ({} bytes)", resume_path.display(), document.len());
    println!(
        "Chunking: size={} overlap={} delimiter={:?}",
        chunking.chunk_size, chunking.chunk_overlap, chunking.section_delimiter
    );

    let chunks = indexer.split(&document);
    if cli.show_chunks {
        for c in &chunks {
            println!("\n  #{} @{} ({} chars)\n  {}", c.index, c.start_offset, c.text.chars().count(), c.text.replace('\n', "\n  "));
        }
    }
    let index = indexer.build_index(indexer.embed_all(chunks)?)?;
    println!("\n✅ Indexed {} chunks (dim {})", index.len(), embedder.dim());

    if let Some(query) = cli.search {
        let k = cli.limit.unwrap_or(settings.retrieval.top_k);
        let result = retrieve(&query, index.as_ref(), embedder.as_ref(), k)?;
        println!("\n🔍 Found {} results for: \"{}\"", result.hits.len(), query);
        for (i, hit) in result.hits.iter().enumerate() {
            println!("\n  {}. score={:.4}  chunk=#{}", i + 1, hit.score, hit.chunk.index);
            println!("     📝 {}", hit.chunk.text.replace('\n', "\n        "));
        }
    }
    Ok(())
}
