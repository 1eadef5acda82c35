use crate::broker::{settled, FileBroker, PendingOperation};
use crate::error::BrokerError;
use crate::file::request::{Accepted, FileRequest};
use crate::file::DeleteOptions;
use crate::notebook::NotebookAction;
use tracing::info;

impl FileBroker {
    /// Delete a file from the store and drop its record from the notebook.
    /// The record id is resolved from the filename before the store call.
    pub fn delete_file(
        &self,
        request: FileRequest<DeleteOptions>,
    ) -> Result<PendingOperation, BrokerError> {
        let Accepted {
            filename, reporter, ..
        } = request.accept_without_options("delete")?;

        let Some(record) = self.notebook.find_file(&filename) else {
            reporter.failure(format!("delete: file \"{filename}\" does not exist"));
            return Ok(settled());
        };

        info!(
            file_request_id = reporter.file_request_id(),
            %filename,
            file_id = record.id,
            "Deleting file"
        );
        let store = self.store.clone();
        let notebook = self.notebook.clone();
        Ok(Box::pin(async move {
            match store.delete(&filename).await {
                Ok(()) => {
                    notebook.dispatch(NotebookAction::DeleteFileFromNotebook {
                        file_id: record.id,
                    });
                    reporter.success(None);
                }
                Err(err) => reporter.failure(err.to_string()),
            }
        }))
    }
}
