//! Mail store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or reading a mail folder.
#[derive(Error, Debug)]
pub enum MailError {
    /// The mail root directory does not exist.
    #[error("Mail root '{0}' does not exist")]
    RootNotFound(PathBuf),

    /// No store or no subfolder with the requested name.
    #[error("Could not find folder '{folder}' under store '{store}'")]
    FolderNotFound { store: String, folder: String },

    /// Failed to read a directory or message file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk a folder tree.
    #[error("Failed to scan folder '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to parse a message.
    #[error("Failed to parse message: {0}")]
    Parse(String),
}

/// Result type for mail store operations.
pub type Result<T> = std::result::Result<T, MailError>;
