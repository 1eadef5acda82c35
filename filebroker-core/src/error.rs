use thiserror::Error;

/// Errors returned directly to the caller of the broker.
///
/// Business-rule failures on file requests (bad fetch type, duplicate or
/// missing files, store rejections) never show up here; those are reported
/// through the request's report channel instead.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("{operation}: missing required argument `{argument}`")]
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("invalid frequency \"{0}\"")]
    InvalidFrequency(String),

    #[error("file store error: {0}")]
    StoreFailure(#[from] anyhow::Error),
}
