//! Grammar construction for Parley voice interactions.
//!
//! Turns high-level descriptions of acceptable input into grammar
//! documents:
//!
//! - [`digit_grammar`]: keypad collection bounded by a digit limit and/or
//!   a terminator
//! - [`literal_options_grammar`]: a single rule whose alternatives are
//!   literal strings
//! - [`tagged_menu_grammar`]: one tagged alternative per menu option, where
//!   the tag is the option's position
//!
//! [`GrammarSet`] merges grammars supplied inline and by URL and works out
//! the effective input mode. [`render::to_xml`] produces the rule-based XML
//! dialect transports consume.
//!
//! # Ordering contract
//!
//! A tagged menu grammar maps a match back to its option purely by tag
//! position. The external recogniser must preserve alternative order and
//! report the tag of the alternative that matched; if it reorders or drops
//! alternatives, dispatch selects the wrong option. This is a precondition
//! on the recognition collaborator, not something this crate can detect.

pub mod builder;
pub mod error;
pub mod grammar;
pub mod keys;
pub mod recognize;
pub mod render;
pub mod set;

pub use builder::{digit_grammar, literal_options_grammar, tagged_menu_grammar, DTMF_KEYS};
pub use error::GrammarError;
pub use grammar::{Grammar, Item, Node, Repeat, Rule, RuleScope, SEMANTICS_LITERALS};
pub use keys::Keys;
pub use recognize::{recognize, recognize_all, strip_terminator, Recognition};
pub use set::{GrammarRef, GrammarSet};
