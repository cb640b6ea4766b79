//! FlowGuard Demo Server
//!
//! Interactive single-page demo that classifies a hand-entered network flow
//! as normal or anomalous.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FLOWGUARD DEMO                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐       ┌───────────────────────────────────┐  │
//! │  │  Page +   │       │  DetectionContext (fitted once)   │  │
//! │  │  JSON API │──────▶│  Normalizer → Isolation Forest    │  │
//! │  │  (Axum)   │       │  → Rate rules                     │  │
//! │  └───────────┘       └─────────────────┬─────────────────┘  │
//! │                                        ▲                    │
//! │                              ┌─────────┴─────────┐          │
//! │                              │  Training CSV     │          │
//! │                              └───────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use anyhow::Context;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flowguard_core::DetectionContext;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "flowguard_server=debug,flowguard_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("FlowGuard demo server starting...");
    tracing::info!("Dataset: {}", config.dataset_path);

    // Fit the model before accepting any request
    let context = DetectionContext::from_csv(
        &config.dataset_path,
        config.forest.clone(),
        config.thresholds.clone(),
    )
    .with_context(|| format!("Failed to build detection model from {}", config.dataset_path))?;

    let summary = context.summary();
    tracing::info!(
        "Model ready: {} rows, {} trees, offset {:.4}",
        summary.dataset_rows,
        summary.trees,
        summary.offset
    );

    // Build application state
    let state = AppState::new(context, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<DetectionContext>,
    pub config: config::Config,
    pub stats: Arc<RequestStats>,
}

impl AppState {
    pub fn new(context: DetectionContext, config: config::Config) -> Self {
        Self {
            context: Arc::new(context),
            config,
            stats: Arc::new(RequestStats::default()),
        }
    }
}

/// Classification request counters
#[derive(Debug, Default)]
pub struct RequestStats {
    classified: AtomicU64,
    anomalies: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestCounters {
    pub classified: u64,
    pub anomalies: u64,
    pub rejected: u64,
}

impl RequestStats {
    pub fn record(&self, is_anomaly: bool) {
        self.classified.fetch_add(1, Ordering::Relaxed);
        if is_anomaly {
            self.anomalies.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RequestCounters {
        RequestCounters {
            classified: self.classified.load(Ordering::Relaxed),
            anomalies: self.anomalies.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/classify", post(handlers::classify::classify))
        .route("/api/v1/examples", get(handlers::classify::examples))
        .route("/api/v1/model", get(handlers::model::status))
        .fallback(handlers::page::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
