use crate::file::{FetchType, FileContent, SavedFile};
use crate::store::{FileSourceStore, FileStore, SavedFileSource};
use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a mocked store operation settles
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Resolve with the configured response
    #[default]
    Succeed,
    /// Reject with the given message
    Fail { message: String },
    /// Wait, then settle as `then`
    Delayed { millis: u64, then: Box<MockBehavior> },
    /// Use the next behavior for each call, then fall back to success
    Queue { behaviors: Vec<MockBehavior> },
}

impl MockBehavior {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
        }
    }

    pub fn delayed(millis: u64, then: MockBehavior) -> Self {
        Self::Delayed {
            millis,
            then: Box::new(then),
        }
    }

    fn next(&mut self) -> MockBehavior {
        if let MockBehavior::Queue { behaviors } = self {
            if behaviors.is_empty() {
                return MockBehavior::Succeed;
            }
            return behaviors.remove(0);
        }
        self.clone()
    }

    async fn settle(self) -> Result<()> {
        let mut current = self;
        loop {
            match current {
                MockBehavior::Succeed | MockBehavior::Queue { .. } => return Ok(()),
                MockBehavior::Fail { message } => return Err(anyhow!(message)),
                MockBehavior::Delayed { millis, then } => {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    current = *then;
                }
            }
        }
    }
}

/// A call observed by the mock store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Load {
        filename: String,
        fetch_type: FetchType,
    },
    Save {
        filename: String,
        content: FileContent,
        overwrite: bool,
    },
    Delete {
        filename: String,
    },
    SaveFileSource {
        notebook_id: String,
        source_url: String,
        destination_filename: String,
        interval: Option<String>,
    },
    DeleteFileSource {
        file_source_id: i64,
    },
}

#[derive(Default)]
struct Behaviors {
    load: MockBehavior,
    save: MockBehavior,
    delete: MockBehavior,
    file_source: MockBehavior,
}

/// Mock file store for testing. Clones share behaviors and recorded calls.
#[derive(Clone)]
pub struct MockStore {
    behaviors: Arc<Mutex<Behaviors>>,
    load_content: Arc<Mutex<FileContent>>,
    save_responses: Arc<Mutex<VecDeque<SavedFile>>>,
    next_id: Arc<Mutex<i64>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            behaviors: Arc::new(Mutex::new(Behaviors::default())),
            load_content: Arc::new(Mutex::new(FileContent::default())),
            save_responses: Arc::new(Mutex::new(VecDeque::new())),
            next_id: Arc::new(Mutex::new(100)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_load_behavior(&self, behavior: MockBehavior) {
        self.behaviors.lock().unwrap().load = behavior;
    }

    pub fn set_save_behavior(&self, behavior: MockBehavior) {
        self.behaviors.lock().unwrap().save = behavior;
    }

    pub fn set_delete_behavior(&self, behavior: MockBehavior) {
        self.behaviors.lock().unwrap().delete = behavior;
    }

    pub fn set_file_source_behavior(&self, behavior: MockBehavior) {
        self.behaviors.lock().unwrap().file_source = behavior;
    }

    pub fn set_load_content(&self, content: impl Into<FileContent>) {
        *self.load_content.lock().unwrap() = content.into();
    }

    /// Queue the metadata returned by the next save. Without a queued
    /// response, saves echo the requested filename with a fresh id.
    pub fn push_save_response(&self, response: SavedFile) {
        self.save_responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn load_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Load { .. }))
    }

    pub fn save_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Save { .. }))
    }

    pub fn delete_count(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Delete { .. }))
    }

    fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn fresh_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }
}

#[async_trait::async_trait]
impl FileStore for MockStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn load(&self, filename: &str, fetch_type: FetchType) -> Result<FileContent> {
        self.record(StoreCall::Load {
            filename: filename.to_string(),
            fetch_type,
        });
        let behavior = self.behaviors.lock().unwrap().load.next();
        behavior.settle().await?;
        Ok(self.load_content.lock().unwrap().clone())
    }

    async fn save(
        &self,
        filename: &str,
        content: FileContent,
        overwrite: bool,
    ) -> Result<SavedFile> {
        self.record(StoreCall::Save {
            filename: filename.to_string(),
            content,
            overwrite,
        });
        let behavior = self.behaviors.lock().unwrap().save.next();
        behavior.settle().await?;
        let queued = self.save_responses.lock().unwrap().pop_front();
        Ok(match queued {
            Some(response) => response,
            None => SavedFile {
                filename: filename.to_string(),
                id: self.fresh_id(),
                last_updated: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        self.record(StoreCall::Delete {
            filename: filename.to_string(),
        });
        let behavior = self.behaviors.lock().unwrap().delete.next();
        behavior.settle().await
    }
}

#[async_trait::async_trait]
impl FileSourceStore for MockStore {
    async fn save_file_source(
        &self,
        notebook_id: &str,
        source_url: &str,
        destination_filename: &str,
        interval: Option<&str>,
    ) -> Result<SavedFileSource> {
        self.record(StoreCall::SaveFileSource {
            notebook_id: notebook_id.to_string(),
            source_url: source_url.to_string(),
            destination_filename: destination_filename.to_string(),
            interval: interval.map(str::to_string),
        });
        let behavior = self.behaviors.lock().unwrap().file_source.next();
        behavior.settle().await?;
        Ok(SavedFileSource {
            id: self.fresh_id(),
        })
    }

    async fn delete_file_source(&self, file_source_id: i64) -> Result<()> {
        self.record(StoreCall::DeleteFileSource { file_source_id });
        let behavior = self.behaviors.lock().unwrap().file_source.next();
        behavior.settle().await
    }
}
