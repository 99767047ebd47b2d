use std::collections::HashSet;

use tracing::debug;

use super::{ApplicationEvent, Ledger};

/// Counts describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub previous_rows: usize,
    /// Rows from the new batch that were not already in the ledger.
    pub new_rows: usize,
    /// Rows dropped because an earlier row had the same key.
    pub duplicates: usize,
    pub total_rows: usize,
}

/// Reconciles a freshly extracted batch with the previously saved ledger.
///
/// Previous rows come first, so when a key collides the saved row wins and
/// any status the user edited by hand survives the re-scan. The result is
/// sorted by `date_received` descending with a stable sort, so rows with
/// equal timestamps keep their concatenation order on every run. Rows are
/// never removed except as duplicates.
pub fn merge(previous: Option<Ledger>, batch: Vec<ApplicationEvent>) -> (Ledger, MergeStats) {
    let previous_rows = previous.map(Ledger::into_rows).unwrap_or_default();
    let previous_count = previous_rows.len();

    let mut seen = HashSet::with_capacity(previous_count + batch.len());
    let mut rows = Vec::with_capacity(previous_count + batch.len());
    let mut duplicates = 0;
    let mut new_rows = 0;

    for (index, row) in previous_rows.into_iter().chain(batch).enumerate() {
        if !seen.insert((row.date_received, row.subject.clone())) {
            duplicates += 1;
            continue;
        }
        if index >= previous_count {
            new_rows += 1;
        }
        rows.push(row);
    }

    rows.sort_by(|a, b| b.date_received.cmp(&a.date_received));

    let stats = MergeStats {
        previous_rows: previous_count,
        new_rows,
        duplicates,
        total_rows: rows.len(),
    };
    debug!(?stats, "Merged ledger");

    (Ledger::from_rows(rows), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DATE_FORMAT;
    use chrono::NaiveDateTime;

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, DATE_FORMAT).unwrap()
    }

    fn event(date: &str, subject: &str, status: &str) -> ApplicationEvent {
        ApplicationEvent {
            date_received: ts(date),
            sender_name: "Acme Corp".to_string(),
            sender_email: "hr@acme.com".to_string(),
            subject: subject.to_string(),
            has_attachments: false,
            status: status.to_string(),
            last_updated: ts("2024-02-01 09:00:00"),
        }
    }

    #[test]
    fn test_first_run_keeps_batch() {
        let batch = vec![
            event("2024-01-06 10:00:00", "B", ""),
            event("2024-01-05 10:00:00", "A", ""),
        ];

        let (ledger, stats) = merge(None, batch.clone());
        assert_eq!(ledger.rows(), batch.as_slice());
        assert_eq!(stats.new_rows, 2);
        assert_eq!(stats.previous_rows, 0);
    }

    #[test]
    fn test_first_run_dedupes_batch() {
        let batch = vec![
            event("2024-01-05 10:00:00", "A", ""),
            event("2024-01-05 10:00:00", "A", ""),
        ];

        let (ledger, stats) = merge(None, batch);
        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_edited_status_is_preserved() {
        let previous = Ledger::from_rows(vec![event(
            "2024-01-05 10:00:00",
            "Thanks for applying",
            "Interview scheduled",
        )]);
        let batch = vec![event("2024-01-05 10:00:00", "Thanks for applying", "")];

        let (ledger, stats) = merge(Some(previous), batch);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.rows()[0].status, "Interview scheduled");
        assert_eq!(stats.new_rows, 0);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let batch = vec![
            event("2024-01-07 10:00:00", "C", ""),
            event("2024-01-05 10:00:00", "A", ""),
        ];
        let previous = Ledger::from_rows(vec![
            event("2024-01-07 10:00:00", "C", "Rejected"),
            event("2024-01-06 10:00:00", "B", "Applied"),
            event("2024-01-05 10:00:00", "A", ""),
        ]);

        let (once, _) = merge(Some(previous.clone()), batch.clone());
        let (twice, stats) = merge(Some(once.clone()), batch);

        assert_eq!(once, previous);
        assert_eq!(twice, once);
        assert_eq!(stats.new_rows, 0);
    }

    #[test]
    fn test_sorted_newest_first() {
        let previous = Ledger::from_rows(vec![
            event("2024-01-03 10:00:00", "old", ""),
            event("2024-01-09 10:00:00", "newer", ""),
        ]);
        let batch = vec![event("2024-01-05 10:00:00", "middle", "")];

        let (ledger, _) = merge(Some(previous), batch);
        let subjects: Vec<&str> = ledger.rows().iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["newer", "middle", "old"]);
    }

    #[test]
    fn test_equal_timestamps_order_is_deterministic() {
        let previous = Ledger::from_rows(vec![event("2024-01-05 10:00:00", "first", "")]);
        let batch = vec![
            event("2024-01-05 10:00:00", "second", ""),
            event("2024-01-05 10:00:00", "third", ""),
        ];

        let (a, _) = merge(Some(previous.clone()), batch.clone());
        let (b, _) = merge(Some(previous), batch);
        assert_eq!(a, b);

        let subjects: Vec<&str> = a.rows().iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_same_subject_different_time_is_distinct() {
        let previous = Ledger::from_rows(vec![event("2024-01-05 10:00:00", "Update", "")]);
        let batch = vec![event("2024-01-05 10:00:01", "Update", "")];

        let (ledger, stats) = merge(Some(previous), batch);
        assert_eq!(ledger.len(), 2);
        assert_eq!(stats.new_rows, 1);
    }

    #[test]
    fn test_rows_missing_from_batch_are_kept() {
        let previous = Ledger::from_rows(vec![
            event("2023-06-01 10:00:00", "ancient", "Ghosted"),
            event("2024-01-05 10:00:00", "A", ""),
        ]);
        let batch = vec![event("2024-01-06 10:00:00", "B", "")];

        let (ledger, stats) = merge(Some(previous), batch);
        assert_eq!(ledger.len(), 3);
        assert_eq!(stats.total_rows, 3);
        assert!(ledger.rows().iter().any(|r| r.subject == "ancient"));
    }
}
