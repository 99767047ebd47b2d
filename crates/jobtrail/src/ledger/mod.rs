//! The persisted table of application events.

pub mod merge;
pub mod xlsx;

pub use merge::{merge, MergeStats};
pub use xlsx::XlsxLedgerStore;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Render format for every timestamp in the ledger.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ledger columns, in the order they are written.
pub const COLUMNS: [&str; 7] = [
    "Date Received",
    "Sender Name",
    "Sender Email",
    "Subject",
    "Has Attachments",
    "Status",
    "Last Updated",
];

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    #[serde(with = "timestamp")]
    pub date_received: NaiveDateTime,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub has_attachments: bool,
    pub status: String,
    #[serde(with = "timestamp")]
    pub last_updated: NaiveDateTime,
}

impl ApplicationEvent {
    /// Uniqueness key: two rows with the same key are the same event.
    pub fn key(&self) -> (NaiveDateTime, &str) {
        (self.date_received, self.subject.as_str())
    }

    pub fn date_received_str(&self) -> String {
        self.date_received.format(DATE_FORMAT).to_string()
    }

    pub fn last_updated_str(&self) -> String {
        self.last_updated.format(DATE_FORMAT).to_string()
    }
}

/// Parses a ledger timestamp. Accepts the canonical format plus the ISO
/// variants a spreadsheet application may have rewritten it to.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    [
        DATE_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    .or_else(|| {
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    rows: Vec<ApplicationEvent>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ApplicationEvent>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ApplicationEvent] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ApplicationEvent> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Persistence seam for the ledger: the whole table is read, then rewritten.
pub trait LedgerStore {
    /// Reads the saved ledger, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Ledger>, LedgerError>;

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;

    /// Human-readable location for log and CLI output.
    fn location(&self) -> String;
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
