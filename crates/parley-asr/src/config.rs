use crate::component::Timeout;
use serde::{Deserialize, Serialize};

fn default_min_confidence() -> f64 {
    0.5
}

fn default_timeout() -> u64 {
    5
}

fn default_inter_digit_timeout() -> u64 {
    2
}

fn default_sensitivity() -> f64 {
    0.5
}

fn default_input_language() -> Option<String> {
    Some("en-US".to_string())
}

/// Defaults applied to every recognizer invocation.
///
/// Timeouts are in seconds. Per-call options always take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Minimum confidence for a match to be accepted.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Initial, inter-digit and max-silence timeout for `ask` and `menu`. `0` waits indefinitely.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Gap allowed between DTMF digits during `listen`.
    #[serde(default = "default_inter_digit_timeout")]
    pub inter_digit_timeout: u64,
    /// Speech sensitivity, 0.0 to 1.0.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Recognizer name. `None` uses the platform default.
    #[serde(default)]
    pub recognizer: Option<String>,
    /// Language set on generated grammars and input. `None` uses the platform default.
    #[serde(default = "default_input_language")]
    pub input_language: Option<String>,
    /// Output renderer name. `None` uses the platform default.
    #[serde(default)]
    pub renderer: Option<String>,
    /// Voice for rendered text. `None` uses the platform default.
    #[serde(default)]
    pub voice: Option<String>,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            timeout: default_timeout(),
            inter_digit_timeout: default_inter_digit_timeout(),
            sensitivity: default_sensitivity(),
            recognizer: None,
            input_language: default_input_language(),
            renderer: None,
            voice: None,
        }
    }
}

impl AsrConfig {
    pub fn collection_timeout(&self) -> Timeout {
        Timeout::from_seconds(self.timeout)
    }

    pub fn inter_digit(&self) -> Timeout {
        Timeout::from_seconds(self.inter_digit_timeout)
    }
}
