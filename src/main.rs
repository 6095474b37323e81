//! Docqa HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use docqa::config::Config;
use docqa::embedding::{EmbedderConfig, TextEmbedder};
use docqa::gateway::{AppState, create_router_with_state};
use docqa::history::ChatHistoryStore;
use docqa::ingest::{CorpusIndexer, IngestManifest};
use docqa::llm::OpenAiCompatBackend;
use docqa::reranker::RerankerConfig;
use docqa::retrieval::QdrantPassageStore;
use docqa::search::{AdaptiveSearcher, SearchConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        "Docqa starting"
    );

    std::fs::create_dir_all(&config.data_dir)?;

    let embedder_config = EmbedderConfig::from_env();
    if embedder_config.model_path.is_none() {
        tracing::warn!("No DOCQA_EMBED_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = Arc::new(TextEmbedder::load(embedder_config)?);

    let store = QdrantPassageStore::new(&config.qdrant_url, &config.collection, embedder)?;
    store.health_check().await?;
    store.ensure_collection().await?;

    tracing::info!(corpus_dir = %config.corpus_dir.display(), "Scanning corpus for new documents");
    let indexer = CorpusIndexer::new(store.clone(), IngestManifest::load(config.manifest_path())?);
    let stats = indexer.ingest_dir(&config.corpus_dir).await?;
    tracing::info!(
        indexed = stats.files_indexed,
        skipped = stats.files_skipped,
        chunks = stats.chunks_indexed,
        "Corpus scan finished"
    );

    let search_config = SearchConfig::default()
        .with_cache_capacity(config.cache_capacity)
        .with_reranker(RerankerConfig::from_env());
    let searcher = Arc::new(AdaptiveSearcher::new(store, search_config));

    let backend = Arc::new(OpenAiCompatBackend::connect(&config.llm_url, &config.llm_model).await);
    let history = Arc::new(ChatHistoryStore::new(config.histories_dir())?);

    let state = AppState::new(searcher, backend, history, config.top_k);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Docqa shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("DOCQA_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8501);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
