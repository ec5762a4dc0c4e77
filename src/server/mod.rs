//! # HTTP Server for the Nameplate Designer
//!
//! Serves the preview and submission endpoints the designer frontend calls.
//!
//! ## Usage
//!
//! ```bash
//! placa serve --listen 0.0.0.0:8080 --webhook-url https://hooks.example.com/labels
//! ```

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::PlacaError;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use placa::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), placa::error::PlacaError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     storage_dir: "/var/lib/placa".into(),
///     public_base_url: "https://files.example.com".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PlacaError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    let app = Router::new()
        // Designer API (submissions carry every saved template in one body)
        .route("/api/preview", post(handlers::preview::render))
        .route(
            "/api/nameplates",
            post(handlers::submit::create).layer(DefaultBodyLimit::max(8 * 1024 * 1024)),
        )
        .layer(cors_layer(&config.allowed_origins))
        .with_state(app_state);

    println!("Placa HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!("Storage dir: {}", config.storage_dir.display());
    match &config.webhook_url {
        Some(url) => println!("Webhook: {}", url),
        None => println!("Webhook: not configured, submissions are refused"),
    }
    println!();

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PlacaError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PlacaError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Browser access control for the API routes. Preflight gets POST+OPTIONS
/// and the content-type header; origins outside the configured list get no
/// CORS headers at all.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
