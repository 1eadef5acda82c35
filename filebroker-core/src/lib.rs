pub mod broker;
pub mod error;
pub mod file;
pub mod file_source;
pub mod notebook;
pub mod report;
pub mod settings;
pub mod store;

// Types most integrations need. Everything else stays public for hosts that
// want to plug in their own state or channel implementations.
pub use broker::{FileBroker, PendingOperation};
pub use error::BrokerError;
pub use file::request::FileRequest;
pub use file::{DeleteOptions, FetchType, FileContent, FileRecord, LoadOptions, SaveOptions};
pub use notebook::{Notebook, NotebookAction, NotebookStore};
pub use report::{sender::OutcomeSender, MessageKind, OutcomeBody, ReportFn};
pub use settings::{Settings, SettingsManager};
pub use store::{FileSourceStore, FileStore};
