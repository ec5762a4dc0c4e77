//! Storage port for rendered summary documents.
//!
//! The real deployment target is bucket-style object storage with public
//! reads; here the port returns the public URL directly so callers never
//! assemble one themselves. `DirStorage` maps keys onto a directory tree,
//! `MemoryStorage` backs tests.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::PlacaError;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an object under `key` and return its public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PlacaError>;
}

/// Directory-backed store: objects land under a root directory and are
/// addressed as `{public_base_url}/{key}`.
pub struct DirStorage {
    root: PathBuf,
    public_base_url: String,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Storage for DirStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, PlacaError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PlacaError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| PlacaError::Storage(format!("write {}: {e}", path.display())))?;
        Ok(format!("{}/{key}", self.public_base_url))
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    public_base_url: String,
}

impl MemoryStorage {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, PlacaError> {
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(format!("{}/{key}", self.public_base_url))
    }
}
