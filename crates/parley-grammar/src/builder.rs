//! Builders that turn high-level option descriptions into grammars.
//!
//! These are pure functions. Each returns a fresh, immutable [`Grammar`];
//! none of them touch configuration or perform I/O.

use crate::error::GrammarError;
use crate::grammar::{Grammar, Item, Node, Repeat, Rule, SEMANTICS_LITERALS};
use crate::keys::Keys;
use parley_types::InputMode;

/// Every key a DTMF keypad can produce, in grammar order.
pub const DTMF_KEYS: [&str; 12] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "#", "*"];

/// Builds a DTMF grammar accepting up to `limit` keypresses.
///
/// With no limit the grammar accepts any number of keys. The terminator is
/// not encoded in the grammar: it is an input-collection parameter and the
/// collecting side stops on it. At least one of the two must be given.
///
/// # Errors
///
/// Returns [`GrammarError::Configuration`] when neither a limit nor a
/// terminator is supplied.
pub fn digit_grammar(limit: Option<u32>, terminator: Option<&str>) -> Result<Grammar, GrammarError> {
    if limit.is_none() && terminator.is_none() {
        return Err(GrammarError::Configuration(
            "You must specify at least one of limit, terminator or grammar".to_string(),
        ));
    }

    let keys = DTMF_KEYS.iter().map(|key| Item::text(*key)).collect();
    let rule = Rule::public("digits").with_node(Node::Item(
        Item::new()
            .with_repeat(Repeat::up_to(limit))
            .with_node(Node::OneOf(keys)),
    ));

    Ok(Grammar::new("digits", InputMode::Dtmf).with_rule(rule))
}

/// Builds a single-rule grammar whose alternatives are the given literals.
///
/// The grammar is in speech mode; callers collecting keypad input can
/// override this with [`Grammar::with_mode`].
///
/// # Errors
///
/// Returns [`GrammarError::Configuration`] when `options` is empty.
pub fn literal_options_grammar<I, S>(options: I, language: Option<&str>) -> Result<Grammar, GrammarError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives: Vec<Item> = options
        .into_iter()
        .map(|option| Item::text(option.as_ref()))
        .collect();

    if alternatives.is_empty() {
        return Err(GrammarError::Configuration(
            "You must provide a grammar, a grammar URL or a set of options".to_string(),
        ));
    }

    let mut grammar = Grammar::new("main", InputMode::Speech)
        .with_rule(Rule::public("main").with_node(Node::OneOf(alternatives)));
    if let Some(language) = language {
        grammar = grammar.with_language(language);
    }
    Ok(grammar)
}

/// Builds a menu grammar with one tagged alternative per key set.
///
/// Alternative `i` carries the tag `i`, so a later match maps back to the
/// `i`-th key set by position. The order of `key_sets` is preserved exactly.
/// When several key sets contain the same input, the earliest one claims it
/// because recognition tries alternatives in document order.
///
/// # Errors
///
/// Returns [`GrammarError::Configuration`] when there are no key sets, or
/// when any key set is empty.
pub fn tagged_menu_grammar<'a, I>(key_sets: I, mode: InputMode) -> Result<Grammar, GrammarError>
where
    I: IntoIterator<Item = &'a Keys>,
{
    let mut alternatives = Vec::new();

    for (index, keys) in key_sets.into_iter().enumerate() {
        let mut item = Item::new().with_node(Node::Tag(index.to_string()));
        match keys.as_slice() {
            [] => {
                return Err(GrammarError::Configuration(format!(
                    "menu option {index} has no keys"
                )))
            }
            [single] => item = item.with_node(Node::Text(single.clone())),
            many => {
                let branches = many.iter().map(|key| Item::text(key.as_str())).collect();
                item = item.with_node(Node::OneOf(branches));
            }
        }
        alternatives.push(item);
    }

    if alternatives.is_empty() {
        return Err(GrammarError::Configuration(
            "You must specify one or more matches.".to_string(),
        ));
    }

    let rule = Rule::public("options")
        .with_node(Node::Item(Item::new().with_node(Node::OneOf(alternatives))));

    Ok(Grammar::new("options", mode)
        .with_tag_format(SEMANTICS_LITERALS)
        .with_rule(rule))
}
