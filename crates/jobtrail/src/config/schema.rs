use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::EventKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default)]
    pub scan_mode: ScanMode,
    #[serde(default = "PhraseSetConfig::acknowledgment")]
    pub acknowledgment: PhraseSetConfig,
    #[serde(default = "PhraseSetConfig::rejection")]
    pub rejection: PhraseSetConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Longest accepted lookback window, in days.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

fn default_window_days() -> u32 {
    90
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            mail: MailConfig::default(),
            window_days: default_window_days(),
            scan_mode: ScanMode::default(),
            acknowledgment: PhraseSetConfig::acknowledgment(),
            rejection: PhraseSetConfig::rejection(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Config {
    /// Returns the phrase set configured for an extraction kind.
    pub fn phrase_set(&self, kind: EventKind) -> &PhraseSetConfig {
        match kind {
            EventKind::Acknowledgment => &self.acknowledgment,
            EventKind::Rejection => &self.rejection,
        }
    }

    /// Ledger path for a kind, with a leading `~` expanded.
    pub fn output_path(&self, kind: EventKind) -> PathBuf {
        expand_home(&self.phrase_set(kind).output_file)
    }

    /// Mail root with a leading `~` expanded.
    pub fn mail_root(&self) -> PathBuf {
        expand_home(&self.mail.root)
    }
}

/// Where the local mail tree lives and which folder to scan by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_root")]
    pub root: String,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_mail_root() -> String {
    "~/Mail".to_string()
}

fn default_folder() -> String {
    "Inbox".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            root: default_mail_root(),
            store: None,
            folder: default_folder(),
        }
    }
}

/// How the extractor walks the enumerated messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Input is newest-first; stop at the first message older than the cutoff.
    #[default]
    NewestFirst,
    /// Inspect every message regardless of order.
    FullScan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseSetConfig {
    pub phrases: Vec<String>,
    #[serde(default)]
    pub default_status: String,
    pub output_file: String,
}

impl PhraseSetConfig {
    pub fn acknowledgment() -> Self {
        Self {
            phrases: to_strings(&[
                "application submitted",
                "application sent",
                "application received",
                "application was received",
                "thank you for applying",
                "thanks for applying",
                "we have received your application",
                "your application has been sent",
            ]),
            default_status: String::new(),
            output_file: "job_applications.xlsx".to_string(),
        }
    }

    pub fn rejection() -> Self {
        Self {
            phrases: to_strings(&[
                "unfortunately",
                "we regret to inform you",
                "not selected",
                "will not be moving forward",
                "no longer in consideration",
                "we won't be moving forward",
                "we won\u{2019}t be moving forward",
                "we're unable to proceed with your application",
                "we\u{2019}re unable to proceed with your application",
                "we have decided not to move forward",
                "we have decided not to proceed",
                "we have decided not to continue",
                "we have decided not to advance",
                "we have decided not to take your application further",
            ]),
            default_status: "No longer in consideration".to_string(),
            output_file: "job_applications_rejections.xlsx".to_string(),
        }
    }
}

fn to_strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.window_days, 90);
        assert_eq!(config.mail.folder, "Inbox");
        assert_eq!(config.scan_mode, ScanMode::NewestFirst);
        assert_eq!(config.ledger.sheet_name, "Sheet1");
    }

    #[test]
    fn test_default_statuses_differ_by_kind() {
        let config = Config::default();
        assert_eq!(config.phrase_set(EventKind::Acknowledgment).default_status, "");
        assert_eq!(
            config.phrase_set(EventKind::Rejection).default_status,
            "No longer in consideration"
        );
    }

    #[test]
    fn test_default_rejection_phrases_are_not_concatenated() {
        let phrases = PhraseSetConfig::rejection().phrases;
        assert!(phrases.contains(&"we have decided not to move forward".to_string()));
        assert!(phrases
            .iter()
            .all(|p| !p.contains("applicationwe") && !p.contains("application we")));
    }

    #[test]
    fn test_scan_mode_serde_names() {
        let mode: ScanMode = serde_json::from_str("\"full_scan\"").unwrap();
        assert_eq!(mode, ScanMode::FullScan);
        assert_eq!(
            serde_json::to_string(&ScanMode::NewestFirst).unwrap(),
            "\"newest_first\""
        );
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/var/mail"), PathBuf::from("/var/mail"));
        assert_eq!(expand_home("ledger.xlsx"), PathBuf::from("ledger.xlsx"));
    }

    #[test]
    fn test_expand_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Mail"), home.join("Mail"));
        }
    }
}
