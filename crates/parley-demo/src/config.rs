//! Demo configuration loading from file and environment variables.

use parley_asr::testing::Scripted;
use parley_asr::AsrConfig;
use parley_types::CompletionEvent;
use serde::Deserialize;
use thiserror::Error;

/// Top-level demo configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Recognizer defaults.
    #[serde(default)]
    pub asr: AsrConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Caller behaviour replayed by the scripted session, consumed in order
    /// by the ask, the listen and then the menu.
    #[serde(default = "default_script")]
    pub script: Vec<Scripted>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "parley_asr=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_script() -> Vec<Scripted> {
    vec![
        Scripted::Caller("1234#".to_string()),
        Scripted::Caller("support".to_string()),
        Scripted::Event(CompletionEvent::NoMatch),
        Scripted::Caller("2".to_string()),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asr: AsrConfig::default(),
            logging: LoggingConfig::default(),
            script: default_script(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PARLEY_LOG_LEVEL` overrides `logging.level`
/// - `PARLEY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `PARLEY_TIMEOUT` overrides `asr.timeout`
/// - `PARLEY_MIN_CONFIDENCE` overrides `asr.min_confidence`
/// - `PARLEY_RECOGNIZER` overrides `asr.recognizer`
/// - `PARLEY_INPUT_LANGUAGE` overrides `asr.input_language`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `PARLEY_*` overrides read through `lookup`.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(level) = lookup("PARLEY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("PARLEY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(timeout) = lookup("PARLEY_TIMEOUT") {
        if let Ok(parsed) = timeout.parse() {
            config.asr.timeout = parsed;
        }
    }
    if let Some(confidence) = lookup("PARLEY_MIN_CONFIDENCE") {
        if let Ok(parsed) = confidence.parse() {
            config.asr.min_confidence = parsed;
        }
    }
    if let Some(recognizer) = lookup("PARLEY_RECOGNIZER") {
        config.asr.recognizer = Some(recognizer).filter(|r| !r.is_empty());
    }
    if let Some(language) = lookup("PARLEY_INPUT_LANGUAGE") {
        config.asr.input_language = Some(language).filter(|l| !l.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.asr.timeout, 5);
        assert_eq!(config.script.len(), 4);
    }

    #[test]
    fn reads_sections_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            script = [{{ caller = "9#" }}, "unanswered"]

            [asr]
            timeout = 8
            voice = "allison"

            [logging]
            level = "debug"
            json = true
            "#
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.asr.timeout, 8);
        assert_eq!(config.asr.voice.as_deref(), Some("allison"));
        assert_eq!(config.asr.min_confidence, 0.5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(
            config.script,
            vec![Scripted::Caller("9#".into()), Scripted::Unanswered]
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[asr\ntimeout = ").unwrap();
        assert!(matches!(
            load_config(file.path().to_str()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [
            ("PARLEY_LOG_LEVEL", "warn"),
            ("PARLEY_LOG_JSON", "1"),
            ("PARLEY_TIMEOUT", "12"),
            ("PARLEY_MIN_CONFIDENCE", "not-a-number"),
            ("PARLEY_RECOGNIZER", "en-engine"),
            ("PARLEY_INPUT_LANGUAGE", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
        assert_eq!(config.asr.timeout, 12);
        assert_eq!(config.asr.min_confidence, 0.5);
        assert_eq!(config.asr.recognizer.as_deref(), Some("en-engine"));
        assert_eq!(config.asr.input_language, None);
    }
}
