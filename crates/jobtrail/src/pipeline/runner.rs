use chrono::{Local, NaiveDateTime};
use tracing::{info, info_span, warn};

use crate::classifier::EventKind;
use crate::config::schema::Config;
use crate::extract::{cutoff_for, ExtractionReport, Extractor};
use crate::ledger::{merge, LedgerStore, MergeStats};
use crate::mail::{FolderHandle, MailStore};

use super::error::PipelineError;

/// Which folder to scan and how far back to look.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub store: String,
    pub folder: String,
    pub window_days: u32,
}

/// What a completed run wrote.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub kind: EventKind,
    pub folder: FolderHandle,
    pub matched: usize,
    pub merge: MergeStats,
    pub output: String,
}

/// One-shot scan, merge and save for a single extraction kind.
pub struct Tracker {
    kind: EventKind,
    extractor: Extractor,
}

impl Tracker {
    pub fn new(config: &Config, kind: EventKind) -> Self {
        Self::with_extractor(Extractor::from_config(config, kind))
    }

    /// The run's kind is the one the extractor's classifier matches.
    pub fn with_extractor(extractor: Extractor) -> Self {
        Self {
            kind: extractor.classifier().kind(),
            extractor,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Scans the folder and merges the matches into the ledger.
    ///
    /// Nothing is written when the folder is missing or no message matches;
    /// the saved ledger is left exactly as it was.
    pub fn run<M, L>(
        &self,
        mail: &M,
        ledger: &L,
        options: &RunOptions,
    ) -> Result<RunSummary, PipelineError>
    where
        M: MailStore + ?Sized,
        L: LedgerStore + ?Sized,
    {
        self.run_at(mail, ledger, options, Local::now().naive_local())
    }

    /// [`Tracker::run`] with an explicit wall-clock reading.
    pub fn run_at<M, L>(
        &self,
        mail: &M,
        ledger: &L,
        options: &RunOptions,
        now: NaiveDateTime,
    ) -> Result<RunSummary, PipelineError>
    where
        M: MailStore + ?Sized,
        L: LedgerStore + ?Sized,
    {
        let _span = info_span!("track",
            kind = %self.kind,
            store = %options.store,
            folder = %options.folder,
        )
        .entered();

        let (folder, report) = self.scan(mail, options, now)?;

        if report.events.is_empty() {
            warn!("No {} emails matched; ledger left untouched", self.kind);
            return Err(PipelineError::NoMatches {
                kind: self.kind,
                window_days: options.window_days,
            });
        }
        let matched = report.events.len();

        let previous = ledger.load()?;
        let (merged, stats) = merge(previous, report.events);
        ledger.save(&merged)?;

        info!(
            matched,
            added = stats.new_rows,
            total = stats.total_rows,
            "Ledger updated at {}",
            ledger.location()
        );

        Ok(RunSummary {
            kind: self.kind,
            folder,
            matched,
            merge: stats,
            output: ledger.location(),
        })
    }

    /// Scans without touching any ledger.
    pub fn preview<M>(&self, mail: &M, options: &RunOptions) -> Result<ExtractionReport, PipelineError>
    where
        M: MailStore + ?Sized,
    {
        self.preview_at(mail, options, Local::now().naive_local())
    }

    pub fn preview_at<M>(
        &self,
        mail: &M,
        options: &RunOptions,
        now: NaiveDateTime,
    ) -> Result<ExtractionReport, PipelineError>
    where
        M: MailStore + ?Sized,
    {
        let _span = info_span!("preview", kind = %self.kind, folder = %options.folder).entered();
        let (_, report) = self.scan(mail, options, now)?;
        Ok(report)
    }

    fn scan<M>(
        &self,
        mail: &M,
        options: &RunOptions,
        now: NaiveDateTime,
    ) -> Result<(FolderHandle, ExtractionReport), PipelineError>
    where
        M: MailStore + ?Sized,
    {
        let folder = mail.lookup_folder(&options.store, &options.folder)?;
        let messages = mail.enumerate_messages(&folder)?;

        let cutoff = cutoff_for(now, options.window_days);
        info!(
            "Scanning {} messages received since {}",
            messages.len(),
            cutoff.format("%Y-%m-%d %H:%M:%S")
        );

        let report = self.extractor.extract(messages, now, cutoff);
        Ok((folder, report))
    }
}
