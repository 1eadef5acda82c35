//! Collaborators that talk to the remote file store.
//!
//! The broker never implements transport itself; hosts provide these traits
//! (an HTTP client, an IPC bridge, ...). Errors are opaque: only their
//! message text is forwarded to the evaluation frame.

pub mod mock;

use crate::file::{FetchType, FileContent, SavedFile};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self, filename: &str, fetch_type: FetchType) -> Result<FileContent>;

    async fn save(&self, filename: &str, content: FileContent, overwrite: bool)
        -> Result<SavedFile>;

    async fn delete(&self, filename: &str) -> Result<()>;
}

/// Response to registering a file source with the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFileSource {
    pub id: i64,
}

#[async_trait::async_trait]
pub trait FileSourceStore: Send + Sync {
    /// `interval` is the server-side schedule string, `None` for never.
    async fn save_file_source(
        &self,
        notebook_id: &str,
        source_url: &str,
        destination_filename: &str,
        interval: Option<&str>,
    ) -> Result<SavedFileSource>;

    async fn delete_file_source(&self, file_source_id: i64) -> Result<()>;
}
