//! Supplier portal assistant server
//!
//! Loads the knowledge base, trains or restores the search index, and
//! serves the question-answering API.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use portal_assist_agent::{load_index, train_index, ModelHandles, SearchService};
use portal_assist_config::AppConfig;
use portal_assist_rag::KnowledgeLoader;
use portal_assist_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load(None).context("failed to load configuration")?;
    let metrics = init_metrics();
    let handles = ModelHandles::from_config(&config);

    // restore saved artifacts when present, otherwise train from the corpus
    let index = match config.server.index_path.as_deref() {
        Some(path) if Path::new(path).exists() => {
            tracing::info!(path, "loading saved index");
            load_index(Path::new(path))?
        }
        maybe_path => {
            let knowledge_path = config
                .server
                .knowledge_path
                .as_deref()
                .context("no saved index and no knowledge_path configured")?;
            tracing::info!(path = knowledge_path, "training index from knowledge base");

            let records = KnowledgeLoader::load_file(Path::new(knowledge_path))?;
            let index = train_index(&records, &handles, &config).await?;

            if let Some(path) = maybe_path {
                index.save(Path::new(path))?;
            }
            index
        }
    };

    let service = SearchService::new(Arc::new(index), handles, config.clone());
    tracing::info!(
        articles = service.article_count(),
        semantic = service.semantic_enabled(),
        "service ready"
    );

    let state = AppState::new(Arc::new(service));
    let router = create_router(state, metrics);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!(%address, "listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
