mod config;
mod errors;
mod extraction;
mod matching;
mod models;
mod routes;
mod screening;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::annotator::HttpAnnotator;
use crate::extraction::information::InformationExtractor;
use crate::matching::bert::BertEmbedder;
use crate::matching::embedder::Embedder;
use crate::matching::ranking::RankingEngine;
use crate::matching::similarity::SimilarityScorer;
use crate::routes::build_router;
use crate::screening::pipeline::Screener;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Load the encoder once for the lifetime of the process
    let model_dir = config.model_dir.clone();
    let embedder = tokio::task::spawn_blocking(move || BertEmbedder::load(&model_dir)).await??;
    info!(
        "Embedder ready: {} ({} dims)",
        embedder.name(),
        embedder.dimension()
    );

    // Annotation service client
    let annotator = HttpAnnotator::new(config.annotator_url.clone(), config.annotator_timeout)?;
    info!("Annotation client initialized ({})", config.annotator_url);

    let screener = Screener::new(
        InformationExtractor::new(Arc::new(annotator)),
        RankingEngine::new(SimilarityScorer::new(Arc::new(embedder))),
    );

    let state = AppState {
        config: config.clone(),
        screener: Arc::new(screener),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
