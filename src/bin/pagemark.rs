//! Command-line demonstration: ingest a document, then answer a question
//!
//! Run with: cargo run --bin pagemark -- <file> "<question>"

use std::sync::Arc;

use pagemark_rag::config::RagConfig;
use pagemark_rag::generation::AnswerEngine;
use pagemark_rag::ingestion::IngestPipeline;
use pagemark_rag::providers::{ChromaStore, GeminiClient, VectorStoreProvider};
use pagemark_rag::retrieval::Retriever;
use pagemark_rag::types::QueryRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagemark_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (file, question) = match (args.next(), args.next()) {
        (Some(file), Some(question)) => (file, question),
        _ => {
            eprintln!("Usage: pagemark <file> \"<question>\"");
            std::process::exit(2);
        }
    };

    let config = match std::env::var("PAGEMARK_CONFIG") {
        Ok(path) => RagConfig::from_file(path)?,
        Err(_) => RagConfig::from_env(),
    };

    let store = Arc::new(ChromaStore::connect(config.store.clone()).await?);
    tracing::info!(stored = store.count().await?, "store connected");

    let filename = std::path::Path::new(&file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.clone());
    let data = tokio::fs::read(&file).await?;

    let pipeline = IngestPipeline::new(&config, store.clone())?;
    let summary = pipeline.ingest(&filename, data).await?;
    println!(
        "Ingested {}: {} chunks ({} tables, {} images, {} pages)",
        summary.filename,
        summary.chunks_stored,
        summary.tables,
        summary.images,
        summary
            .total_pages
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string()),
    );

    let request = QueryRequest::new(question).with_top_k(config.retrieval.top_k);
    let retriever = Retriever::new(store);
    let context = retriever.retrieve(&request.question, request.top_k).await?;

    let engine = AnswerEngine::new(Arc::new(GeminiClient::new(config.llm.clone())?));
    let response = engine.answer(&request.question, &context).await?;

    println!("\n{}", response.answer);
    if !response.citations.is_empty() {
        let pages: Vec<String> = response.citations.iter().map(|p| p.to_string()).collect();
        println!("\nSources: pages {}", pages.join(", "));
    }

    Ok(())
}
