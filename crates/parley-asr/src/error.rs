use parley_grammar::GrammarError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsrError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The transport reported an error while prompting or collecting.
    #[error("Interaction error: {0}")]
    Interaction(String),

    /// The transport reported an error during `listen`.
    #[error("Listen error: {0}")]
    Listen(String),

    #[error("Unknown completion reason received: {0}")]
    UnknownCompletion(String),

    /// The call ended before the operation could be submitted.
    #[error("Call session is no longer active")]
    SessionGone,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

impl AsrError {
    /// True for transport-reported failures, including the `listen` subtype.
    pub fn is_interaction(&self) -> bool {
        matches!(self, Self::Interaction(_) | Self::Listen(_))
    }
}
