//! z360-docs: documentation chat and export server

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use z360_docs::api::{create_router, AppState};
use z360_docs::config::Config;
use z360_docs::corpus::{Corpus, FsCorpus};
use z360_docs::llm::{AzureService, GenerationService, LoggingService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "z360_docs=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // An unreadable content root is fatal
    tracing::info!(path = %config.content_dir.display(), "Loading docs corpus");
    let corpus = FsCorpus::load(&config.content_dir)?;
    tracing::info!(
        root = %corpus.root().display(),
        pages = corpus.pages().len(),
        "Docs corpus loaded"
    );
    let corpus: Arc<dyn Corpus> = Arc::new(corpus);

    let generator: Option<Arc<dyn GenerationService>> = match &config.azure {
        Some(azure) => {
            let service: Arc<dyn GenerationService> = Arc::new(AzureService::new(azure)?);
            tracing::info!(
                resource = %azure.resource_name,
                model = %service.model_id(),
                "Generation provider configured"
            );
            Some(Arc::new(LoggingService::new(service)))
        }
        None => {
            tracing::warn!(
                "No generation provider configured. Set AZURE_RESOURCE_NAME and AZURE_API_KEY."
            );
            None
        }
    };

    let state = AppState::new(corpus, generator, &config.site_name);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Z360 docs server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
