//! The normalised outcome of one interaction attempt.

use crate::nlsml::Nlsml;
use crate::{CompletionStatus, InputMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome of one prompt-and-collect attempt.
///
/// `confidence`, `interpretation` and `nlsml` are only ever present when
/// `status` is [`CompletionStatus::Match`]; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    status: CompletionStatus,
    mode: Option<InputMode>,
    confidence: Option<f64>,
    utterance: Option<String>,
    interpretation: Option<Value>,
    nlsml: Option<Nlsml>,
}

impl InteractionResult {
    /// Builds a match result. `utterance` is expected to be normalised already.
    pub fn matched(
        mode: Option<InputMode>,
        confidence: Option<f64>,
        utterance: Option<String>,
        interpretation: Option<Value>,
        nlsml: Nlsml,
    ) -> Self {
        Self {
            status: CompletionStatus::Match,
            mode,
            confidence,
            utterance,
            interpretation,
            nlsml: Some(nlsml),
        }
    }

    pub fn no_match() -> Self {
        Self::bare(CompletionStatus::NoMatch)
    }

    pub fn no_input() -> Self {
        Self::bare(CompletionStatus::NoInput)
    }

    pub fn hangup() -> Self {
        Self::bare(CompletionStatus::Hangup)
    }

    pub fn stop() -> Self {
        Self::bare(CompletionStatus::Stop)
    }

    fn bare(status: CompletionStatus) -> Self {
        Self {
            status,
            mode: None,
            confidence: None,
            utterance: None,
            interpretation: None,
            nlsml: None,
        }
    }

    pub fn status(&self) -> CompletionStatus {
        self.status
    }

    pub fn is_match(&self) -> bool {
        self.status == CompletionStatus::Match
    }

    pub fn mode(&self) -> Option<InputMode> {
        self.mode
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// The recognised text. For DTMF this is the normalised digit string.
    pub fn utterance(&self) -> Option<&str> {
        self.utterance.as_deref()
    }

    /// Alias of [`InteractionResult::utterance`].
    pub fn response(&self) -> Option<&str> {
        self.utterance()
    }

    pub fn interpretation(&self) -> Option<&Value> {
        self.interpretation.as_ref()
    }

    pub fn nlsml(&self) -> Option<&Nlsml> {
        self.nlsml.as_ref()
    }
}

impl fmt::Display for InteractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response().unwrap_or_default())
    }
}
