use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::schema::{Config, PhraseSetConfig, MAX_WINDOW_DAYS};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// Environment variable naming a config file to use when none is given explicitly.
pub const CONFIG_ENV_VAR: &str = "JOBTRAIL_CONFIG";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Picks the config file to load: the explicit path, then `$JOBTRAIL_CONFIG`,
/// then `<config_dir>/jobtrail/config.json` if it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("jobtrail").join("config.json"))
        .filter(|path| path.is_file())
}

/// Loads the resolved config file, or the built-in defaults when there is none.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            load_config(path)
        }
        None => {
            debug!("No config file found, using built-in defaults");
            Ok(Config::default())
        }
    }
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.window_days == 0 || config.window_days > MAX_WINDOW_DAYS {
        return Err(ConfigError::Validation {
            message: format!(
                "window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS, config.window_days
            ),
        });
    }

    validate_phrase_set("acknowledgment", &config.acknowledgment)?;
    validate_phrase_set("rejection", &config.rejection)?;

    Ok(())
}

fn validate_phrase_set(kind: &str, set: &PhraseSetConfig) -> Result<(), ConfigError> {
    if set.phrases.iter().all(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidPhrases {
            kind: kind.to_string(),
            reason: "at least one non-blank phrase is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for phrase in &set.phrases {
        let normalized = phrase.trim().to_lowercase();
        if normalized.is_empty() {
            warn!("Ignoring blank phrase in '{}' phrase list", kind);
        } else if !seen.insert(normalized) {
            warn!("Duplicate phrase '{}' in '{}' phrase list", phrase, kind);
        }
    }

    Ok(())
}
