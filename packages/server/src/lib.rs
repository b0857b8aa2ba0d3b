#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the quarter map application.
//!
//! Serves the REST API the map frontend consumes: the source registry,
//! normalized quarter polygons as `GeoJSON`, rejection counts, and batch
//! statistics. The currently selected source, the loaded batch, and the
//! layer-visibility flag live in an explicit per-server session rather
//! than globals, so the pipeline itself stays pure.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use quarter_map_pipeline::NormalizedBatch;
use quarter_map_source_models::QuarterSource;
use tokio::sync::RwLock;

/// Mutable per-server session: what the original map page kept in
/// globals, owned here by the orchestrating caller.
#[derive(Debug, Default)]
pub struct Session {
    /// Currently selected source, if any.
    pub source: Option<QuarterSource>,
    /// Most recently loaded batch, if any.
    pub batch: Option<NormalizedBatch>,
    /// Whether the quarters layer should be rendered.
    pub visible: bool,
}

/// Shared application state.
pub struct AppState {
    /// HTTP client reused across source loads.
    pub client: reqwest::Client,
    /// Session state guarded for concurrent handlers.
    pub session: RwLock<Session>,
}

impl AppState {
    /// Builds the initial state with an empty session.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which indicates
    /// a broken TLS environment and is fatal at startup.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("quarter-map/1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            session: RwLock::new(Session {
                visible: true,
                ..Session::default()
            }),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Starts the quarter map API server.
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`) and for
/// initializing logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let state = web::Data::new(AppState::new());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/sources", web::get().to(handlers::sources))
                    .route("/sources/{id}/load", web::post().to(handlers::load))
                    .route("/quarters", web::get().to(handlers::quarters))
                    .route("/stats", web::get().to(handlers::stats))
                    .route("/clear", web::post().to(handlers::clear))
                    .route("/visibility", web::post().to(handlers::visibility)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
