//! Outcome reporting back to the evaluation frame.
//!
//! Each accepted request gets a [`Reporter`] that owns the caller's one-shot
//! [`ReportFn`]. Both success and failure consume the reporter, so a request
//! can only ever be answered once.

pub mod sender;

use crate::file::FileContent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag sent as the first element of every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    RequestedFileOperationSuccess,
    RequestedFileOperationError,
}

impl MessageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestedFileOperationSuccess => "REQUESTED_FILE_OPERATION_SUCCESS",
            Self::RequestedFileOperationError => "REQUESTED_FILE_OPERATION_ERROR",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body sent as the second element of every report.
///
/// Error is listed first so untagged deserialization does not mistake an
/// error body for a success without a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutcomeBody {
    Error {
        reason: String,
        #[serde(rename = "fileRequestID")]
        file_request_id: String,
    },
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<FileContent>,
        #[serde(rename = "fileRequestID")]
        file_request_id: String,
    },
}

impl OutcomeBody {
    pub fn file_request_id(&self) -> &str {
        match self {
            Self::Error {
                file_request_id, ..
            }
            | Self::Success {
                file_request_id, ..
            } => file_request_id,
        }
    }
}

/// The caller-supplied report channel. Invoked exactly once per accepted
/// request; the broker makes no assumption about what happens afterwards.
pub type ReportFn = Box<dyn FnOnce(MessageKind, OutcomeBody) + Send>;

/// Result of a single accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        file_request_id: String,
        payload: Option<FileContent>,
    },
    Failure {
        file_request_id: String,
        reason: String,
    },
}

impl Outcome {
    pub fn into_message(self) -> (MessageKind, OutcomeBody) {
        match self {
            Self::Success {
                file_request_id,
                payload,
            } => (
                MessageKind::RequestedFileOperationSuccess,
                OutcomeBody::Success {
                    response: payload,
                    file_request_id,
                },
            ),
            Self::Failure {
                file_request_id,
                reason,
            } => (
                MessageKind::RequestedFileOperationError,
                OutcomeBody::Error {
                    reason,
                    file_request_id,
                },
            ),
        }
    }
}

/// Pairs a correlation token with the report function it must answer.
pub(crate) struct Reporter {
    file_request_id: String,
    report: ReportFn,
}

impl Reporter {
    pub(crate) fn new(file_request_id: String, report: ReportFn) -> Self {
        Self {
            file_request_id,
            report,
        }
    }

    pub(crate) fn file_request_id(&self) -> &str {
        &self.file_request_id
    }

    pub(crate) fn success(self, payload: Option<FileContent>) {
        tracing::debug!(file_request_id = %self.file_request_id, "Reporting file operation success");
        let outcome = Outcome::Success {
            file_request_id: self.file_request_id,
            payload,
        };
        Self::emit(self.report, outcome);
    }

    pub(crate) fn failure(self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(file_request_id = %self.file_request_id, %reason, "Reporting file operation error");
        let outcome = Outcome::Failure {
            file_request_id: self.file_request_id,
            reason,
        };
        Self::emit(self.report, outcome);
    }

    fn emit(report: ReportFn, outcome: Outcome) {
        let (kind, body) = outcome.into_message();
        report(kind, body);
    }
}
