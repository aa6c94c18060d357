//! Shared types for the Parley voice interaction engine.
//!
//! This crate provides the vocabulary every other Parley crate speaks:
//! input modes, the closed taxonomy of completion events reported by a
//! telephony transport, the NLSML-like match document carried by a
//! successful recognition, the normalised [`InteractionResult`], and the
//! minimal prompt/output document types.
//!
//! Nothing here performs I/O. Grammar construction lives in
//! `parley-grammar`; execution against a session lives in `parley-asr`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod event;
pub mod markup;
pub mod nlsml;
pub mod prompt;
pub mod result;

pub use event::{CompletionEvent, MatchReason};
pub use markup::MarkupError;
pub use nlsml::{InputUtterance, Interpretation, Nlsml};
pub use prompt::{OutputDocument, Prompt};
pub use result::InteractionResult;

/// The channel through which a caller provides input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Touch-tone keypad input.
    Dtmf,
    /// Spoken input. Grammars written for "voice" mode map here.
    #[serde(alias = "voice")]
    Speech,
    /// Either DTMF or speech is accepted.
    Any,
}

impl InputMode {
    /// Returns the canonical string label for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dtmf => "dtmf",
            Self::Speech => "speech",
            Self::Any => "any",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InputMode {
    type Err = ParseInputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dtmf" => Ok(Self::Dtmf),
            "speech" | "voice" => Ok(Self::Speech),
            "any" => Ok(Self::Any),
            _ => Err(ParseInputModeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown input mode string.
#[derive(Debug, Clone, Error)]
#[error("unknown input mode: {0}")]
pub struct ParseInputModeError(pub String);

/// Outcome status of a single collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Input was collected and matched the grammar.
    Match,
    /// Input was collected but matched nothing.
    #[serde(rename = "nomatch")]
    NoMatch,
    /// No input arrived before the timeouts expired.
    #[serde(rename = "noinput")]
    NoInput,
    /// The call ended while collecting.
    Hangup,
    /// Collection was stopped before completing.
    Stop,
}

impl CompletionStatus {
    /// Returns the string label for this status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::NoMatch => "nomatch",
            Self::NoInput => "noinput",
            Self::Hangup => "hangup",
            Self::Stop => "stop",
        }
    }

    /// Whether this status ends the call session rather than the attempt.
    pub fn is_session_ending(self) -> bool {
        matches!(self, Self::Hangup | Self::Stop)
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
