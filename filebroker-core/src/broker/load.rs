use crate::broker::{settled, FileBroker, PendingOperation};
use crate::error::BrokerError;
use crate::file::request::{Accepted, FileRequest};
use crate::file::{FetchType, LoadOptions};
use tracing::info;

impl FileBroker {
    /// Load a file from the store and report its contents. Loading never
    /// touches the notebook state; placing the content is up to the caller.
    pub fn load_file(
        &self,
        request: FileRequest<LoadOptions>,
    ) -> Result<PendingOperation, BrokerError> {
        let Accepted {
            filename,
            options,
            reporter,
        } = request.accept("load")?;

        let fetch_type = match options.parse_fetch_type() {
            Ok(fetch_type) => fetch_type,
            Err(reason) => {
                tracing::debug!(valid = ?FetchType::valid_values(), "Rejecting fetch type");
                reporter.failure(reason);
                return Ok(settled());
            }
        };

        info!(
            file_request_id = reporter.file_request_id(),
            %filename,
            %fetch_type,
            "Loading file"
        );
        let store = self.store.clone();
        Ok(Box::pin(async move {
            match store.load(&filename, fetch_type).await {
                Ok(content) => reporter.success(Some(content)),
                Err(err) => reporter.failure(err.to_string()),
            }
        }))
    }
}
