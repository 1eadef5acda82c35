use crate::error::BrokerError;
use crate::report::{ReportFn, Reporter};

/// A file request as it arrives from the evaluation frame.
///
/// Every argument is optional at this layer so that an integration that
/// forgets one can be told so before anything else happens. Empty strings are
/// treated the same as absent ones.
pub struct FileRequest<O> {
    pub filename: Option<String>,
    pub file_request_id: Option<String>,
    pub options: Option<O>,
    pub report: Option<ReportFn>,
}

impl<O> Default for FileRequest<O> {
    fn default() -> Self {
        Self {
            filename: None,
            file_request_id: None,
            options: None,
            report: None,
        }
    }
}

impl<O> FileRequest<O> {
    /// Create a request with every argument present
    pub fn new(
        filename: impl Into<String>,
        file_request_id: impl Into<String>,
        options: O,
        report: ReportFn,
    ) -> Self {
        Self {
            filename: Some(filename.into()),
            file_request_id: Some(file_request_id.into()),
            options: Some(options),
            report: Some(report),
        }
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn file_request_id(mut self, file_request_id: impl Into<String>) -> Self {
        self.file_request_id = Some(file_request_id.into());
        self
    }

    pub fn options(mut self, options: O) -> Self {
        self.options = Some(options);
        self
    }

    pub fn report(mut self, report: ReportFn) -> Self {
        self.report = Some(report);
        self
    }

    /// Validate a request whose options bag is mandatory (load, save).
    pub(crate) fn accept(self, operation: &'static str) -> Result<Accepted<O>, BrokerError> {
        let (filename, file_request_id) = required_names(
            operation,
            self.filename.as_deref(),
            self.file_request_id.as_deref(),
        )?;
        let options = self.options.ok_or(BrokerError::MissingArgument {
            operation,
            argument: "options",
        })?;
        let report = self.report.ok_or(BrokerError::MissingArgument {
            operation,
            argument: "report",
        })?;

        Ok(Accepted {
            filename,
            options,
            reporter: Reporter::new(file_request_id, report),
        })
    }

    /// Validate a request whose options bag may be omitted (delete).
    pub(crate) fn accept_without_options(
        self,
        operation: &'static str,
    ) -> Result<Accepted<Option<O>>, BrokerError> {
        let (filename, file_request_id) = required_names(
            operation,
            self.filename.as_deref(),
            self.file_request_id.as_deref(),
        )?;
        let report = self.report.ok_or(BrokerError::MissingArgument {
            operation,
            argument: "report",
        })?;

        Ok(Accepted {
            filename,
            options: self.options,
            reporter: Reporter::new(file_request_id, report),
        })
    }
}

fn required_names(
    operation: &'static str,
    filename: Option<&str>,
    file_request_id: Option<&str>,
) -> Result<(String, String), BrokerError> {
    let filename = non_empty(filename).ok_or(BrokerError::MissingArgument {
        operation,
        argument: "filename",
    })?;
    let file_request_id = non_empty(file_request_id).ok_or(BrokerError::MissingArgument {
        operation,
        argument: "file_request_id",
    })?;
    Ok((filename.to_string(), file_request_id.to_string()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A request that passed argument validation. From here on every path must
/// end by consuming `reporter`.
pub(crate) struct Accepted<O> {
    pub filename: String,
    pub options: O,
    pub reporter: Reporter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{DeleteOptions, LoadOptions};
    use std::sync::{Arc, Mutex};

    fn counting_report() -> (ReportFn, Arc<Mutex<usize>>) {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let report: ReportFn = Box::new(move |_, _| *counter.lock().unwrap() += 1);
        (report, calls)
    }

    fn missing(err: BrokerError) -> &'static str {
        match err {
            BrokerError::MissingArgument { argument, .. } => argument,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_accept_reports_first_missing_argument_in_order() {
        let request: FileRequest<LoadOptions> = FileRequest::default();
        assert_eq!(missing(request.accept("load").err().unwrap()), "filename");

        let request: FileRequest<LoadOptions> = FileRequest::default().filename("file1.csv");
        assert_eq!(
            missing(request.accept("load").err().unwrap()),
            "file_request_id"
        );

        let request: FileRequest<LoadOptions> = FileRequest::default()
            .filename("file1.csv")
            .file_request_id("some-file-id");
        assert_eq!(missing(request.accept("load").err().unwrap()), "options");

        let request = FileRequest::default()
            .filename("file1.csv")
            .file_request_id("some-file-id")
            .options(LoadOptions::new("text"));
        assert_eq!(missing(request.accept("load").err().unwrap()), "report");
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let (report, calls) = counting_report();
        let request = FileRequest::new("", "id", LoadOptions::new("text"), report);
        assert_eq!(missing(request.accept("load").err().unwrap()), "filename");

        let (report, _) = counting_report();
        let request = FileRequest::new("file1.csv", "", LoadOptions::new("text"), report);
        assert_eq!(
            missing(request.accept("load").err().unwrap()),
            "file_request_id"
        );
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_delete_options_may_be_omitted() {
        let (report, calls) = counting_report();
        let request: FileRequest<DeleteOptions> = FileRequest::default()
            .filename("file1.csv")
            .file_request_id("id")
            .report(report);
        let accepted = request.accept_without_options("delete").unwrap();
        assert_eq!(accepted.filename, "file1.csv");
        assert!(accepted.options.is_none());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_delete_still_requires_report() {
        let request: FileRequest<DeleteOptions> = FileRequest::default()
            .filename("test.csv")
            .file_request_id("some-id");
        assert_eq!(
            missing(request.accept_without_options("delete").err().unwrap()),
            "report"
        );
    }
}
