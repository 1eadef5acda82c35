use crate::broker::{settled, FileBroker, PendingOperation};
use crate::error::BrokerError;
use crate::file::request::{Accepted, FileRequest};
use crate::file::{FileRecord, SaveOptions};
use crate::notebook::NotebookAction;
use tracing::info;

impl FileBroker {
    /// Save a file to the store, then add (or replace) its record in the
    /// notebook. The success report carries no response body; the new record
    /// is visible through the notebook state instead.
    pub fn save_file(
        &self,
        request: FileRequest<SaveOptions>,
    ) -> Result<PendingOperation, BrokerError> {
        let Accepted {
            filename,
            options,
            reporter,
        } = request.accept("save")?;

        if self.notebook.find_file(&filename).is_some() && !options.overwrite {
            reporter.failure(format!("save: file \"{filename}\" already exists"));
            return Ok(settled());
        }

        info!(
            file_request_id = reporter.file_request_id(),
            %filename,
            overwrite = options.overwrite,
            bytes = options.content.len(),
            "Saving file"
        );
        let store = self.store.clone();
        let notebook = self.notebook.clone();
        Ok(Box::pin(async move {
            match store
                .save(&filename, options.content, options.overwrite)
                .await
            {
                Ok(saved) => {
                    let record = FileRecord::from(saved);
                    notebook.dispatch(NotebookAction::AddFileToNotebook {
                        filename: record.filename,
                        last_updated: record.last_updated,
                        file_id: record.id,
                    });
                    reporter.success(None);
                }
                Err(err) => reporter.failure(err.to_string()),
            }
        }))
    }
}
