//! Mail store access.
//!
//! The core only needs two things from a mail store: find a folder by store
//! and folder name, and enumerate that folder's messages newest-first. The
//! [`MailStore`] trait captures that seam; [`DirectoryMailStore`] implements
//! it over a local tree of `.eml` files and Maildir folders.

pub mod error;
pub mod parser;
pub mod store;

pub use error::MailError;
pub use parser::MessageParser;
pub use store::DirectoryMailStore;

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

/// Class of a folder item. Only [`ItemKind::Mail`] is eligible for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Mail,
    Calendar,
    Other,
}

/// A message as handed over by the mail store.
///
/// Every field except `kind` may be absent. The accessor methods normalize
/// absent values to their documented defaults so extraction never has to.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub kind: ItemKind,
    pub received_at: Option<DateTime<FixedOffset>>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub attachment_count: Option<u32>,
}

impl RawMessage {
    /// An empty mail item; fill in fields with struct update syntax.
    pub fn mail() -> Self {
        Self {
            kind: ItemKind::Mail,
            received_at: None,
            subject: None,
            body: None,
            sender_name: None,
            sender_email: None,
            attachment_count: None,
        }
    }

    pub fn is_mail(&self) -> bool {
        self.kind == ItemKind::Mail
    }

    /// Received time on the local wall clock, the same clock the run's
    /// `now` is read from. Ordering follows the actual instant regardless of
    /// the sender's offset.
    pub fn received_naive(&self) -> Option<NaiveDateTime> {
        self.received_at
            .map(|t| t.with_timezone(&Local).naive_local())
    }

    /// Subject with surrounding whitespace removed, as stored in the ledger.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default().trim()
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn sender_name(&self) -> &str {
        self.sender_name.as_deref().unwrap_or_default().trim()
    }

    pub fn sender_email(&self) -> &str {
        self.sender_email.as_deref().unwrap_or_default().trim()
    }

    pub fn attachment_count(&self) -> u32 {
        self.attachment_count.unwrap_or(0)
    }

    pub fn has_attachments(&self) -> bool {
        self.attachment_count() > 0
    }
}

/// A located folder inside a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHandle {
    pub store: String,
    pub folder: String,
    pub path: PathBuf,
}

/// A store and the names of its immediate subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreListing {
    pub store: String,
    pub folders: Vec<String>,
}

pub trait MailStore {
    /// Finds `folder` directly under `store`; both names compare
    /// case-insensitively.
    fn lookup_folder(&self, store: &str, folder: &str) -> error::Result<FolderHandle>;

    /// Returns the folder's messages ordered newest received first.
    fn enumerate_messages(&self, folder: &FolderHandle) -> error::Result<Vec<RawMessage>>;

    /// Lists every store with its immediate subfolders.
    fn list_folders(&self) -> error::Result<Vec<StoreListing>>;
}
