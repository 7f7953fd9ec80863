//! # File records
//!
//! [`FileRecord`] is the server's description of one uploaded file. The client
//! only displays records and passes their `id` back for download/delete; it
//! never edits them.
//!
//! `upload_date` is kept as the raw string the server sent. The server emits
//! ISO-8601 timestamps, sometimes without an offset (naive local time), so
//! [`FileRecord::formatted_upload_date`] accepts both shapes and degrades to a
//! readable placeholder instead of failing.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category the server assigns from the file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Excel,
    Txt,
    Word,
    #[serde(other)]
    Other,
}

impl FileType {
    /// Value for an `<input type="file" accept=...>` attribute.
    pub fn accept_attribute() -> &'static str {
        ".pdf,.xlsx,.xls,.txt,.doc,.docx"
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
            Self::Txt => "txt",
            Self::Word => "word",
            Self::Other => "other",
        }
    }
}

/// A file owned by the current user, as listed by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub file_type: FileType,
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Owner of the file.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl FileRecord {
    /// Human-readable upload timestamp.
    pub fn formatted_upload_date(&self) -> String {
        let Some(raw) = self.upload_date.as_deref() else {
            return "Date not available".to_string();
        };
        match parse_timestamp(raw) {
            Some(ts) => ts.format("%B %-d, %Y, %H:%M:%S").to_string(),
            None => {
                tracing::debug!("Unparsable upload_date {:?}", raw);
                "Invalid date format".to_string()
            }
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
