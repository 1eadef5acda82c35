//! Local notebook state as seen by the broker.
//!
//! The broker only ever reads a snapshot and dispatches actions; how the
//! host stores its state is its own business. [`Notebook`] is the in-memory
//! store used by the subprocess bridge and the tests.

pub mod reducer;

use crate::file::FileRecord;
use crate::file_source::Frequency;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Mutation descriptors accepted by [`NotebookStore::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotebookAction {
    AddFileToNotebook {
        filename: String,
        #[serde(rename = "lastUpdated")]
        last_updated: String,
        #[serde(rename = "fileID")]
        file_id: i64,
    },
    DeleteFileFromNotebook {
        #[serde(rename = "fileID")]
        file_id: i64,
    },
    AddFileSourceToNotebook {
        #[serde(rename = "sourceURL")]
        source_url: String,
        #[serde(rename = "fileSourceID")]
        file_source_id: i64,
        #[serde(rename = "destinationFilename")]
        destination_filename: String,
        frequency: Frequency,
    },
    DeleteFileSourceFromNotebook {
        #[serde(rename = "fileSourceID")]
        file_source_id: i64,
    },
}

/// A remote URL fetched into a notebook file on a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSourceRecord {
    pub id: i64,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub destination_filename: String,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookInfo {
    #[serde(rename = "notebook_id")]
    pub notebook_id: String,
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub file_sources: Vec<FileSourceRecord>,
}

impl NotebookInfo {
    pub fn new(notebook_id: impl Into<String>, files: Vec<FileRecord>) -> Self {
        Self {
            notebook_id: notebook_id.into(),
            files,
            file_sources: Vec::new(),
        }
    }

    pub fn find_file(&self, filename: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.filename == filename)
    }
}

/// Read-snapshot plus dispatch over the host's notebook state.
pub trait NotebookStore: Send + Sync {
    fn notebook_id(&self) -> String;

    fn files(&self) -> Vec<FileRecord>;

    fn file_sources(&self) -> Vec<FileSourceRecord>;

    fn dispatch(&self, action: NotebookAction);

    fn find_file(&self, filename: &str) -> Option<FileRecord> {
        self.files().into_iter().find(|f| f.filename == filename)
    }
}

/// In-memory notebook state driven by [`reducer::reduce`].
///
/// Clones share the same state and the same action log.
#[derive(Clone, Default)]
pub struct Notebook {
    inner: Arc<Mutex<NotebookInfo>>,
    dispatched: Arc<Mutex<Vec<NotebookAction>>>,
}

impl Notebook {
    pub fn new(info: NotebookInfo) -> Self {
        Self {
            inner: Arc::new(Mutex::new(info)),
            dispatched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn info(&self) -> NotebookInfo {
        self.inner.lock().unwrap().clone()
    }

    /// Every action dispatched so far, oldest first
    pub fn dispatched_actions(&self) -> Vec<NotebookAction> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn clear_dispatched_actions(&self) {
        self.dispatched.lock().unwrap().clear();
    }
}

impl NotebookStore for Notebook {
    fn notebook_id(&self) -> String {
        self.inner.lock().unwrap().notebook_id.clone()
    }

    fn files(&self) -> Vec<FileRecord> {
        self.inner.lock().unwrap().files.clone()
    }

    fn file_sources(&self) -> Vec<FileSourceRecord> {
        self.inner.lock().unwrap().file_sources.clone()
    }

    fn dispatch(&self, action: NotebookAction) {
        tracing::debug!(?action, "Dispatching notebook action");
        reducer::reduce(&mut self.inner.lock().unwrap(), &action);
        self.dispatched.lock().unwrap().push(action);
    }

    fn find_file(&self, filename: &str) -> Option<FileRecord> {
        self.inner.lock().unwrap().find_file(filename).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actions_serialize_with_type_tag() {
        let add = NotebookAction::AddFileToNotebook {
            filename: "test.csv".to_string(),
            last_updated: "a-date-string".to_string(),
            file_id: 0,
        };
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({
                "type": "ADD_FILE_TO_NOTEBOOK",
                "filename": "test.csv",
                "lastUpdated": "a-date-string",
                "fileID": 0
            })
        );

        let delete = NotebookAction::DeleteFileFromNotebook { file_id: 0 };
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({ "type": "DELETE_FILE_FROM_NOTEBOOK", "fileID": 0 })
        );

        let source = NotebookAction::AddFileSourceToNotebook {
            source_url: "https://example.com/data.csv".to_string(),
            file_source_id: 4,
            destination_filename: "data.csv".to_string(),
            frequency: Frequency::Daily,
        };
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({
                "type": "ADD_FILE_SOURCE_TO_NOTEBOOK",
                "sourceURL": "https://example.com/data.csv",
                "fileSourceID": 4,
                "destinationFilename": "data.csv",
                "frequency": "daily"
            })
        );
    }

    #[test]
    fn test_notebook_records_dispatched_actions() {
        let notebook = Notebook::new(NotebookInfo::new(
            "nb-1",
            vec![FileRecord::new(0, "file1.csv", "2019-04-03")],
        ));
        let clone = notebook.clone();

        clone.dispatch(NotebookAction::DeleteFileFromNotebook { file_id: 0 });

        assert!(notebook.files().is_empty());
        assert_eq!(
            notebook.dispatched_actions(),
            vec![NotebookAction::DeleteFileFromNotebook { file_id: 0 }]
        );
        notebook.clear_dispatched_actions();
        assert!(clone.dispatched_actions().is_empty());
    }

    #[test]
    fn test_find_file_by_name() {
        let notebook = Notebook::new(NotebookInfo::new(
            "nb-1",
            vec![
                FileRecord::new(0, "file1.csv", "a"),
                FileRecord::new(1, "file2.csv", "b"),
            ],
        ));
        assert_eq!(notebook.find_file("file2.csv").map(|f| f.id), Some(1));
        assert!(notebook.find_file("missing.csv").is_none());
        assert_eq!(notebook.notebook_id(), "nb-1");
    }
}
