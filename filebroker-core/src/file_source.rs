//! Scheduled file sources: remote URLs the server fetches into a notebook
//! file on a fixed schedule.
//!
//! Unlike file requests these are driven by the host application itself, so
//! store failures are returned to the caller rather than reported.

use crate::error::BrokerError;
use crate::notebook::{NotebookAction, NotebookStore};
use crate::store::{FileSourceStore, SavedFileSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::VariantArray;
use tracing::{info, warn};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Never,
    Daily,
    Weekly,
}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Schedule string understood by the server
    pub const fn interval(self) -> Option<&'static str> {
        match self {
            Self::Never => None,
            Self::Daily => Some("1 day, 0:00:00"),
            Self::Weekly => Some("7 days, 0:00:00"),
        }
    }

    pub fn valid_values() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }
}

impl TryFrom<&str> for Frequency {
    type Error = BrokerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "never" => Ok(Self::Never),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(BrokerError::InvalidFrequency(value.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct FileSourceManager {
    store: Arc<dyn FileSourceStore>,
    notebook: Arc<dyn NotebookStore>,
}

impl FileSourceManager {
    pub fn new(store: Arc<dyn FileSourceStore>, notebook: Arc<dyn NotebookStore>) -> Self {
        Self { store, notebook }
    }

    /// Register a file source for the current notebook. A missing frequency
    /// means the source is fetched once and never refreshed.
    pub async fn add_file_source(
        &self,
        source_url: &str,
        destination_filename: &str,
        frequency: Option<&str>,
    ) -> Result<SavedFileSource, BrokerError> {
        let frequency = frequency
            .map(Frequency::try_from)
            .transpose()
            .inspect_err(|_| warn!(valid = ?Frequency::valid_values(), "Rejecting frequency"))?
            .unwrap_or_default();
        let notebook_id = self.notebook.notebook_id();

        let response = self
            .store
            .save_file_source(
                &notebook_id,
                source_url,
                destination_filename,
                frequency.interval(),
            )
            .await?;

        info!(
            file_source_id = response.id,
            source_url,
            destination_filename,
            frequency = frequency.as_str(),
            "Added file source"
        );
        self.notebook.dispatch(NotebookAction::AddFileSourceToNotebook {
            source_url: source_url.to_string(),
            file_source_id: response.id,
            destination_filename: destination_filename.to_string(),
            frequency,
        });
        Ok(response)
    }

    pub async fn delete_file_source(&self, file_source_id: i64) -> Result<(), BrokerError> {
        self.store.delete_file_source(file_source_id).await?;

        info!(file_source_id, "Deleted file source");
        self.notebook
            .dispatch(NotebookAction::DeleteFileSourceFromNotebook { file_source_id });
        Ok(())
    }
}
