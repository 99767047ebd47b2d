//! Isolated mail tree and ledger for integration tests.
//!
//! Layout under the temp dir: `mail/<store>/<folder>/*.eml` and
//! `ledgers/<kind>.xlsx`.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use jobtrail::pipeline::PipelineError;
use jobtrail::{
    Config, DirectoryMailStore, EventKind, Ledger, LedgerStore, RunOptions, RunSummary, Tracker,
    XlsxLedgerStore,
};

use super::builders::{ConfigBuilder, MessageBuilder};

pub const STORE: &str = "work@example.com";
pub const FOLDER: &str = "Inbox";

pub struct TestHarness {
    temp_dir: TempDir,
    pub mail_root: PathBuf,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(ConfigBuilder::new())
    }

    /// The mail root and store of `builder` are pointed at the temp dir.
    pub fn with_config(builder: ConfigBuilder) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mail_root = temp_dir.child("mail");
        mail_root
            .child(STORE)
            .child(FOLDER)
            .create_dir_all()
            .expect("Failed to create folder");

        let config = builder
            .mail_root(&mail_root.path().to_string_lossy())
            .store(STORE)
            .build();

        Self {
            mail_root: mail_root.path().to_path_buf(),
            temp_dir,
            config,
        }
    }

    /// Drops a message file into the default folder.
    pub fn add_message(&self, name: &str, message: &MessageBuilder) {
        self.temp_dir
            .child("mail")
            .child(STORE)
            .child(FOLDER)
            .child(name)
            .write_str(&message.build())
            .expect("Failed to write message");
    }

    pub fn ledger_path(&self, kind: EventKind) -> PathBuf {
        self.temp_dir
            .child("ledgers")
            .child(format!("{}.xlsx", kind.as_str()))
            .path()
            .to_path_buf()
    }

    pub fn ledger_store(&self, kind: EventKind) -> XlsxLedgerStore {
        XlsxLedgerStore::new(self.ledger_path(kind), self.config.ledger.sheet_name.clone())
    }

    pub fn mail_store(&self) -> DirectoryMailStore {
        DirectoryMailStore::new(&self.mail_root)
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            store: STORE.to_string(),
            folder: FOLDER.to_string(),
            window_days: self.config.window_days,
        }
    }

    pub fn run_at(&self, kind: EventKind, now: NaiveDateTime) -> Result<RunSummary, PipelineError> {
        let tracker = Tracker::new(&self.config, kind);
        tracker.run_at(&self.mail_store(), &self.ledger_store(kind), &self.options(), now)
    }

    pub fn load_ledger(&self, kind: EventKind) -> Option<Ledger> {
        self.ledger_store(kind)
            .load()
            .expect("Failed to load ledger")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// 2024-03-01 12:00:00, a week after the default message date.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// An RFC 2822 date as it appears in the ledger: the local wall clock.
pub fn local_time(rfc2822: &str) -> NaiveDateTime {
    DateTime::parse_from_rfc2822(rfc2822)
        .expect("valid RFC 2822 date")
        .with_timezone(&Local)
        .naive_local()
}
