pub mod matcher;

pub use matcher::PhraseClassifier;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of application event an extraction run looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Acknowledgment,
    Rejection,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acknowledgment => "acknowledgment",
            Self::Rejection => "rejection",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
