use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobtrailError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail store error: {0}")]
    Mail(#[from] crate::mail::MailError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid phrase list for '{kind}': {reason}")]
    InvalidPhrases { kind: String, reason: String },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to open ledger '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Ledger '{path}' has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("Ledger '{path}' is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid ledger row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write ledger '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

pub type Result<T> = std::result::Result<T, JobtrailError>;
