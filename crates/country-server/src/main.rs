//! Country Cache Server
//!
//! REST service caching country metadata enriched with exchange rates and an
//! estimated GDP, plus a rendered summary image.
//!
//! Uses SQLite (embedded) for persistence.

mod handlers;
mod services;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use country_core::ports::{CountryStore, SummaryRenderer};
use country_core::RandomMultiplier;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use services::{ExternalApiClient, PngSummaryRenderer, RefreshService};
use settings::Settings;
use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CountryStore>,
    pub refresh: Arc<RefreshService>,
    pub renderer: Arc<dyn SummaryRenderer>,
    pub settings: Arc<Settings>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&settings.log_format) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting {} v{} ({})",
        settings.app_name,
        env!("CARGO_PKG_VERSION"),
        settings.environment
    );
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(settings).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` picks the level (default `info`); `json` switches to JSON lines
fn init_tracing(log_format: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    if log_format.eq_ignore_ascii_case("json") {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

async fn run_server(settings: Settings) -> Result<()> {
    info!(
        "Config loaded: bind={}, db={}, cache={}",
        settings.bind_address(),
        settings.database_url,
        settings.cache_dir.display()
    );

    // Initialize SQLite database
    info!("Initializing SQLite database...");
    let db = Arc::new(
        Database::new(&settings.database_url)
            .await
            .context("Failed to initialize database")?,
    );
    info!("SQLite database initialized");

    tokio::fs::create_dir_all(&settings.cache_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create cache directory {}",
                settings.cache_dir.display()
            )
        })?;

    // Initialize services
    info!("Initializing services...");
    let client = Arc::new(
        ExternalApiClient::new(
            &settings.restcountries_api_url,
            &settings.exchange_rate_api_url,
            settings.request_timeout(),
        )
        .context("Failed to create external API client")?,
    );
    let renderer = Arc::new(PngSummaryRenderer::new(settings.cache_dir.clone()));
    let refresh = RefreshService::new(
        db.clone(),
        client.clone(),
        client,
        renderer.clone(),
        Arc::new(RandomMultiplier),
        settings.request_timeout(),
    )
    .with_top_n(settings.summary_top_n);
    info!("Services initialized");

    let addr: SocketAddr = settings
        .bind_address()
        .parse()
        .context("Failed to parse bind address")?;

    let state = AppState {
        store: db,
        refresh: Arc::new(refresh),
        renderer,
        settings: Arc::new(settings),
    };

    info!("Building HTTP router...");
    let app = build_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status::status))
        .route("/countries", get(handlers::countries::list))
        .route("/countries/refresh", post(handlers::countries::refresh))
        .route("/countries/image", get(handlers::countries::image))
        .route(
            "/countries/:name",
            get(handlers::countries::get).delete(handlers::countries::delete),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = if settings.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
