use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_log_filter() -> String {
    "info".to_string()
}

/// Broker settings, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Notebook the broker serves; file sources are registered against it
    #[serde(default)]
    pub notebook_id: String,

    /// `tracing_subscriber::EnvFilter` directive for the broker's log file
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Directory for the log file. Defaults to `~/.filebroker/trace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notebook_id: String::new(),
            log_filter: default_log_filter(),
            trace_dir: None,
        }
    }
}
