use chrono::{Duration, NaiveDateTime, SubsecRound};
use tracing::{debug, info};

use crate::classifier::{EventKind, PhraseClassifier};
use crate::config::schema::{Config, ScanMode};
use crate::ledger::ApplicationEvent;
use crate::mail::RawMessage;

/// Start of the lookback window: `now - window_days`. Messages received at
/// or after this instant are inside the window.
///
/// A window reaching past the earliest representable date starts there.
pub fn cutoff_for(now: NaiveDateTime, window_days: u32) -> NaiveDateTime {
    Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Outcome of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub events: Vec<ApplicationEvent>,
    /// Items pulled from the input, including the one that stopped the scan.
    pub inspected: usize,
    pub skipped_non_mail: usize,
    pub skipped_undated: usize,
    /// Mail items in the window that no phrase matched.
    pub unmatched: usize,
    /// Items older than the cutoff that were skipped in full-scan mode.
    pub outside_window: usize,
    pub stopped_early: bool,
}

/// Turns a message stream into application events for one kind.
pub struct Extractor {
    classifier: PhraseClassifier,
    default_status: String,
    scan_mode: ScanMode,
}

impl Extractor {
    pub fn new(
        classifier: PhraseClassifier,
        default_status: impl Into<String>,
        scan_mode: ScanMode,
    ) -> Self {
        Self {
            classifier,
            default_status: default_status.into(),
            scan_mode,
        }
    }

    pub fn from_config(config: &Config, kind: EventKind) -> Self {
        Self::new(
            PhraseClassifier::from_config(config, kind),
            config.phrase_set(kind).default_status.clone(),
            config.scan_mode,
        )
    }

    pub fn classifier(&self) -> &PhraseClassifier {
        &self.classifier
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    /// Extracts every qualifying message received at or after `cutoff`.
    ///
    /// In [`ScanMode::NewestFirst`] the input must be ordered newest received
    /// first: the scan ends at the first dated mail item older than `cutoff`
    /// and never pulls another item from the iterator. Items that are not
    /// mail or carry no timestamp are skipped without ending the scan.
    ///
    /// `now` is the run's single wall-clock reading and is stamped on every
    /// event as `last_updated`.
    pub fn extract<I>(
        &self,
        messages: I,
        now: NaiveDateTime,
        cutoff: NaiveDateTime,
    ) -> ExtractionReport
    where
        I: IntoIterator<Item = RawMessage>,
    {
        let last_updated = now.trunc_subsecs(0);
        let mut report = ExtractionReport::default();

        for message in messages {
            report.inspected += 1;

            if !message.is_mail() {
                report.skipped_non_mail += 1;
                continue;
            }

            let Some(received) = message.received_naive() else {
                report.skipped_undated += 1;
                continue;
            };

            if received < cutoff {
                match self.scan_mode {
                    ScanMode::NewestFirst => {
                        debug!("Reached message older than cutoff {}, stopping scan", cutoff);
                        report.stopped_early = true;
                        break;
                    }
                    ScanMode::FullScan => {
                        report.outside_window += 1;
                        continue;
                    }
                }
            }

            if !self.classifier.matches(message.subject(), message.body()) {
                report.unmatched += 1;
                continue;
            }

            report.events.push(ApplicationEvent {
                date_received: received.trunc_subsecs(0),
                sender_name: message.sender_name().to_string(),
                sender_email: message.sender_email().to_string(),
                subject: message.subject().to_string(),
                has_attachments: message.has_attachments(),
                status: self.default_status.clone(),
                last_updated,
            });
        }

        info!(
            kind = %self.classifier.kind(),
            matched = report.events.len(),
            inspected = report.inspected,
            stopped_early = report.stopped_early,
            "Extraction finished"
        );

        report
    }
}
