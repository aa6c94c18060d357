//! Error types for grammar construction.

/// Errors that can occur while building a grammar document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The caller supplied an option combination that cannot produce a grammar.
    #[error("grammar configuration error: {0}")]
    Configuration(String),

    /// A repeat range whose upper bound lies below its lower bound.
    #[error("invalid repeat range: {0}")]
    InvalidRepeat(String),

    /// The grammar document could not be written out.
    #[error(transparent)]
    Render(#[from] parley_types::MarkupError),
}
