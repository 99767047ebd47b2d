use thiserror::Error;

use crate::classifier::EventKind;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Mail(#[from] crate::mail::MailError),

    #[error(transparent)]
    Ledger(#[from] crate::error::LedgerError),

    #[error("No {kind} emails found in the last {window_days} days")]
    NoMatches { kind: EventKind, window_days: u32 },
}

impl PipelineError {
    /// Whether the run found nothing to record rather than failing.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoMatches { .. })
    }
}
