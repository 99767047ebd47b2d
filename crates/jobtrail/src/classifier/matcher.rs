use crate::config::schema::Config;

use super::EventKind;

/// Case-insensitive substring matcher over a message's subject and body.
///
/// Matching is plain containment: a phrase embedded in a longer word still
/// counts, and there is no stemming or locale-aware folding beyond
/// `str::to_lowercase`.
#[derive(Debug, Clone)]
pub struct PhraseClassifier {
    kind: EventKind,
    /// Lowercased, non-blank phrases in configured order.
    phrases: Vec<String>,
}

impl PhraseClassifier {
    pub fn new<I, S>(kind: EventKind, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().to_lowercase())
            .filter(|p| !p.trim().is_empty())
            .collect();

        Self { kind, phrases }
    }

    pub fn from_config(config: &Config, kind: EventKind) -> Self {
        Self::new(kind, &config.phrase_set(kind).phrases)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn matches(&self, subject: &str, body: &str) -> bool {
        self.matching_phrase(subject, body).is_some()
    }

    /// Returns the first configured phrase found in the subject or body.
    pub fn matching_phrase(&self, subject: &str, body: &str) -> Option<&str> {
        let subject = subject.to_lowercase();
        let body = body.to_lowercase();

        self.phrases
            .iter()
            .find(|phrase| subject.contains(phrase.as_str()) || body.contains(phrase.as_str()))
            .map(String::as_str)
    }
}
