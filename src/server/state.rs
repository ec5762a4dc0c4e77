//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PlacaError;
use crate::preview::Typeface;
use crate::submission::{DirStorage, HttpWebhook, Notifier, Storage};

/// Server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Webhook URL submissions are forwarded to. Without one the server
    /// still previews, but submissions are refused.
    pub webhook_url: Option<String>,
    /// Root directory for stored summary PDFs.
    pub storage_dir: PathBuf,
    /// Public base URL under which stored objects are reachable.
    pub public_base_url: String,
    /// Origins allowed to call the API from a browser. Empty allows any.
    pub allowed_origins: Vec<String>,
    /// Optional TTF font for previews; the built-in bitmap faces otherwise.
    pub font_path: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub storage: Arc<dyn Storage>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub typeface: Typeface,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, PlacaError> {
        let typeface = match &config.font_path {
            Some(path) => Typeface::load_ttf(path)?,
            None => Typeface::builtin(),
        };
        let storage: Arc<dyn Storage> = Arc::new(DirStorage::new(
            &config.storage_dir,
            &config.public_base_url,
        ));
        let notifier = match &config.webhook_url {
            Some(url) => Some(Arc::new(HttpWebhook::new(url)?) as Arc<dyn Notifier>),
            None => None,
        };
        Ok(Self {
            config,
            storage,
            notifier,
            typeface,
        })
    }
}
