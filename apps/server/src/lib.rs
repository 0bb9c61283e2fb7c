pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardmatch_core::content::builtin;
use cardmatch_core::{PairsContent, SingleSelectContent};

use crate::config::ServerConfig;
use crate::services::cue::{ClientCueBackend, ShellCueController, ASSETS_ROUTE};
use crate::services::screens::ScreenRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub screens: Arc<ScreenRegistry>,
    pub cues: Arc<ShellCueController>,
}

impl AppState {
    /// State over the built-in screens, with cues resolved under `asset_dir`.
    pub fn new(asset_dir: &Path) -> error::Result<Self> {
        Self::from_content(
            builtin::single_select_screens(),
            builtin::pairs_screens(),
            asset_dir,
        )
    }

    /// State over the given tables. Invalid content is reported as
    /// [`error::ApiError::Content`].
    pub fn from_content(
        single: Vec<SingleSelectContent>,
        pairs: Vec<PairsContent>,
        asset_dir: &Path,
    ) -> error::Result<Self> {
        let screens = ScreenRegistry::from_content(single, pairs)?;
        let cues = ShellCueController::new(ClientCueBackend::new(asset_dir));

        Ok(Self {
            screens: Arc::new(screens),
            cues: Arc::new(cues),
        })
    }
}

/// Build the full router, serving assets from `asset_dir`.
pub fn build_router(state: AppState, asset_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Screen routes
        .route("/api/screens", get(routes::screens::list))
        .route("/api/screens/:id", get(routes::screens::get))
        .route("/api/screens/:id/mount", post(routes::screens::mount))
        .route("/api/screens/:id/select", post(routes::screens::select))
        .route("/api/screens/:id/check", post(routes::screens::check))
        .route("/api/screens/:id/advance", post(routes::screens::advance))
        .route("/api/screens/:id/replay", post(routes::screens::replay))
        .route("/api/screens/:id/unmount", post(routes::screens::unmount))
        // Cue routes
        .route("/api/cue", get(routes::cue::now_playing))
        .nest_service(ASSETS_ROUTE, ServeDir::new(asset_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!("Loading screens...");
    let state = AppState::new(&config.asset_dir)?;

    if !config.asset_dir.is_dir() {
        tracing::warn!(
            "Asset directory {} not found, cues will be silent",
            config.asset_dir.display()
        );
    }

    let app = build_router(state, &config.asset_dir);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
