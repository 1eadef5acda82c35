//! Request orchestrators.
//!
//! Every operation follows the same shape: validate the arguments (errors go
//! straight back to the caller), check business rules against the notebook
//! snapshot (failures are reported), then hand back a [`PendingOperation`]
//! that runs the store call, reconciles state and reports. The pending
//! operation always resolves to `()`; its outcome is only visible through the
//! request's report function.
//!
//! Concurrent requests share nothing but the notebook. Two saves racing on
//! the same filename both report their own result and the later
//! reconciliation wins.

mod delete;
mod load;
mod save;

use crate::notebook::NotebookStore;
use crate::store::FileStore;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The asynchronous half of an accepted request.
pub type PendingOperation = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Clone)]
pub struct FileBroker {
    store: Arc<dyn FileStore>,
    notebook: Arc<dyn NotebookStore>,
}

impl FileBroker {
    pub fn new(store: Arc<dyn FileStore>, notebook: Arc<dyn NotebookStore>) -> Self {
        Self { store, notebook }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}

/// Returned when a request was answered before reaching the store.
fn settled() -> PendingOperation {
    Box::pin(std::future::ready(()))
}
