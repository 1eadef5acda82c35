//! Notebook file types shared by the orchestrators, the state reconciler and
//! the store collaborators.
//!
//! `request.rs` holds the request envelope and the argument validation that
//! runs before any side effect.

pub mod request;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strum::VariantArray;

/// A file as known to the local notebook state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub last_updated: String,
}

impl FileRecord {
    pub fn new(id: i64, filename: impl Into<String>, last_updated: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            last_updated: last_updated.into(),
        }
    }
}

/// How the remote store should hand back a loaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::VariantArray)]
#[serde(rename_all = "snake_case")]
pub enum FetchType {
    Text,
    Binary,
}

impl FetchType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }

    pub fn valid_values() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }
}

impl TryFrom<&str> for FetchType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(Self::Text),
            "binary" => Ok(Self::Binary),
            _ => Err(format!("invalid fetch type \"{value}\"")),
        }
    }
}

impl fmt::Display for FetchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File contents as moved between the store and the evaluation frame.
///
/// On the wire the content is sent bare: text as a JSON string, binary as a
/// base64 string. Incoming content is a string (text) or an array of bytes
/// (binary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Binary(#[serde(serialize_with = "base64_bytes::serialize")] Vec<u8>),
}

impl<'de> Deserialize<'de> for FileContent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Incoming {
            Text(String),
            Bytes(Vec<u8>),
        }

        Ok(match Incoming::deserialize(deserializer)? {
            Incoming::Text(text) => Self::Text(text),
            Incoming::Bytes(bytes) => Self::Binary(bytes),
        })
    }
}

impl Default for FileContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FileContent {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for FileContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FileContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }
}

/// Options bag for a load request. `fetch_type` is kept as whatever JSON the
/// frame sent (or nothing at all) until the load orchestrator checks it, since
/// a missing or unknown value is a reportable failure rather than a malformed
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_type: Option<Value>,
}

impl LoadOptions {
    pub fn new(fetch_type: impl Into<String>) -> Self {
        Self {
            fetch_type: Some(Value::String(fetch_type.into())),
        }
    }

    /// Resolve the requested fetch type. The error is the failure reason
    /// reported back to the frame; a missing value reads as `undefined`.
    pub fn parse_fetch_type(&self) -> Result<FetchType, String> {
        match &self.fetch_type {
            Some(Value::String(value)) => FetchType::try_from(value.as_str()),
            Some(other) => Err(format!("invalid fetch type \"{other}\"")),
            None => Err("invalid fetch type \"undefined\"".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub content: FileContent,
}

impl SaveOptions {
    pub fn new(overwrite: bool) -> Self {
        Self {
            overwrite,
            content: FileContent::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<FileContent>) -> Self {
        self.content = content.into();
        self
    }
}

/// Delete takes no options today; the bag is accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptions {}

/// Metadata returned by the remote store after a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFile {
    pub filename: String,
    pub id: i64,
    pub last_updated: String,
}

impl From<SavedFile> for FileRecord {
    fn from(saved: SavedFile) -> Self {
        Self {
            id: saved.id,
            filename: saved.filename,
            last_updated: saved.last_updated,
        }
    }
}
