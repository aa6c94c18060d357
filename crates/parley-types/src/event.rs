//! Completion events reported by the transport when a component finishes.

use crate::nlsml::Nlsml;
use crate::InputMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The terminal reason a submitted input, output or prompt component ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CompletionEvent {
    /// Input matched the active grammar.
    Match(MatchReason),
    /// Input was received that matched nothing.
    #[serde(rename = "nomatch")]
    NoMatch,
    /// Timeouts expired before any input arrived.
    #[serde(rename = "noinput")]
    NoInput,
    /// The call ended while the component was running.
    Hangup,
    /// The component was stopped on request.
    Stop,
    /// An output component played to the end. Never valid for input.
    Finish,
    /// The transport failed to run the component.
    Error {
        details: String,
    },
    /// A reason the transport passed through without understanding it.
    Unrecognized {
        name: String,
    },
}

impl CompletionEvent {
    /// Short name of the event variant, for logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Match(_) => "match",
            Self::NoMatch => "nomatch",
            Self::NoInput => "noinput",
            Self::Hangup => "hangup",
            Self::Stop => "stop",
            Self::Finish => "finish",
            Self::Error { .. } => "error",
            Self::Unrecognized { name } => name,
        }
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self::Error {
            details: details.into(),
        }
    }
}

/// Payload of a successful match.
///
/// All accessors read from the first interpretation of the carried document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    pub nlsml: Nlsml,
}

impl MatchReason {
    pub fn new(nlsml: Nlsml) -> Self {
        Self { nlsml }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.nlsml.best().map(|i| i.confidence)
    }

    /// The raw utterance, before any DTMF normalisation.
    pub fn utterance(&self) -> Option<&str> {
        self.nlsml
            .best()
            .and_then(|i| i.input.as_ref())
            .map(|input| input.text.as_str())
    }

    pub fn mode(&self) -> Option<InputMode> {
        self.nlsml
            .best()
            .and_then(|i| i.input.as_ref())
            .map(|input| input.mode)
    }

    pub fn interpretation(&self) -> Option<&Value> {
        self.nlsml.best().and_then(|i| i.instance())
    }
}

impl From<Nlsml> for MatchReason {
    fn from(nlsml: Nlsml) -> Self {
        Self::new(nlsml)
    }
}
