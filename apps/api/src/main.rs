mod catalog;
mod config;
mod db;
mod errors;
mod layout;
mod magazine;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{FsPhotoResolver, InMemoryPhotoCatalog, PgPhotoCatalog, PhotoCatalog};
use crate::config::Config;
use crate::db::create_pool;
use crate::render::{CommandRenderer, DocumentRenderer, MarkupRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Magazine API v{}", env!("CARGO_PKG_VERSION"));

    // Photo catalog: PostgreSQL when configured, otherwise text-only documents
    let catalog: Arc<dyn PhotoCatalog> = match &config.database_url {
        Some(url) => Arc::new(PgPhotoCatalog::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set, documents will be text-only");
            Arc::new(InMemoryPhotoCatalog::default())
        }
    };

    if !config.upload_folder.is_dir() {
        warn!(
            "Upload folder {} does not exist, photos will not resolve",
            config.upload_folder.display()
        );
    }

    // Renderer: external HTML→PDF command when configured, otherwise HTML
    let renderer: Arc<dyn DocumentRenderer> = match config
        .render_command
        .as_deref()
        .and_then(CommandRenderer::from_command_line)
    {
        Some(command) => {
            info!("Rendering PDFs with '{}'", command.program());
            Arc::new(command)
        }
        None => {
            info!("RENDER_COMMAND not set, serving HTML documents");
            Arc::new(MarkupRenderer)
        }
    };

    info!(
        "Magazine config: {} family names, {} photos/chapter, pull quotes < {} chars, render deadline {}s",
        config.magazine.family_names.len(),
        config.magazine.max_photos_per_chapter,
        config.magazine.pull_quote_max_length,
        config.render_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        catalog,
        resolver: Arc::new(FsPhotoResolver),
        renderer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
