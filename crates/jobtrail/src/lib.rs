pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod mail;
pub mod pipeline;

pub use classifier::{EventKind, PhraseClassifier};
pub use config::{load_config, Config, ScanMode};
pub use error::{ConfigError, JobtrailError, LedgerError, Result};
pub use extract::{cutoff_for, ExtractionReport, Extractor};
pub use ledger::{merge, ApplicationEvent, Ledger, LedgerStore, MergeStats, XlsxLedgerStore};
pub use mail::{DirectoryMailStore, FolderHandle, ItemKind, MailError, MailStore, RawMessage};
pub use pipeline::{PipelineError, RunOptions, RunSummary, Tracker};
