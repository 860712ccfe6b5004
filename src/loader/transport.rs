use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use crate::model::raw::RawDocument;

/// Fetches a document body by location.
#[async_trait]
pub trait DocumentTransport: Send + Sync {
    /// Fetch and parse the document at `location`.
    async fn fetch(&self, location: &str) -> anyhow::Result<RawDocument>;
}

/// [`DocumentTransport`] reading JSON files below a root directory.
#[derive(Clone, Debug)]
pub struct FsTransport {
    root: PathBuf,
}

impl FsTransport {
    /// Resolve document locations against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory document locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentTransport for FsTransport {
    async fn fetch(&self, location: &str) -> anyhow::Result<RawDocument> {
        let path = self.root.join(location);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("open document JSON '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse document JSON '{}'", path.display()))
    }
}
