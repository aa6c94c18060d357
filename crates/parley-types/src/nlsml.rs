//! NLSML-like match documents.
//!
//! A recogniser reports a successful match as an ordered list of
//! interpretations. Each carries a confidence, the input utterance with the
//! mode it arrived in, and one or more opaque semantic instances. Consumers
//! treat the *first* interpretation, and within it the *first* instance, as
//! authoritative. Order is supplied by the transport and is never
//! re-ranked by confidence.

use crate::InputMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured multi-interpretation match document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nlsml {
    /// Grammar identifier the recogniser matched against, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,
    /// Interpretations in transport order.
    #[serde(default)]
    pub interpretations: Vec<Interpretation>,
}

impl Nlsml {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interpretation, preserving insertion order.
    pub fn with_interpretation(mut self, interpretation: Interpretation) -> Self {
        self.interpretations.push(interpretation);
        self
    }

    /// The authoritative interpretation: the first one supplied.
    pub fn best(&self) -> Option<&Interpretation> {
        self.interpretations.first()
    }
}

/// One candidate reading of the caller's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Recogniser confidence, 0.0 to 1.0.
    pub confidence: f64,
    /// The raw input and the mode it was collected in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputUtterance>,
    /// Semantic payloads. For tagged menu grammars these are tag literals.
    #[serde(default)]
    pub instances: Vec<Value>,
}

impl Interpretation {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            input: None,
            instances: Vec::new(),
        }
    }

    pub fn with_input(mut self, text: impl Into<String>, mode: InputMode) -> Self {
        self.input = Some(InputUtterance {
            text: text.into(),
            mode,
        });
        self
    }

    pub fn with_instance(mut self, instance: impl Into<Value>) -> Self {
        self.instances.push(instance.into());
        self
    }

    /// The first semantic instance, if any.
    pub fn instance(&self) -> Option<&Value> {
        self.instances.first()
    }
}

/// The utterance a caller produced, as reported by the recogniser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputUtterance {
    pub text: String,
    pub mode: InputMode,
}
