//! Merging grammars supplied by value and by reference.

use crate::grammar::Grammar;
use parley_types::InputMode;
use serde::{Deserialize, Serialize};

/// A grammar carried inline or referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarRef {
    Value(Grammar),
    Url(String),
}

impl GrammarRef {
    /// Mode of an inline grammar. Referenced grammars are opaque.
    pub fn mode(&self) -> Option<InputMode> {
        match self {
            Self::Value(grammar) => Some(grammar.mode),
            Self::Url(_) => None,
        }
    }
}

impl From<Grammar> for GrammarRef {
    fn from(grammar: Grammar) -> Self {
        Self::Value(grammar)
    }
}

/// An ordered list of grammars for one collection attempt.
///
/// Inline grammars come first in the order they were added, followed by
/// URLs, matching the order the caller declared them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarSet {
    grammars: Vec<GrammarRef>,
}

impl GrammarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenates inline grammars and grammar URLs into one set.
    pub fn merge<G, U>(values: G, urls: U) -> Self
    where
        G: IntoIterator<Item = Grammar>,
        U: IntoIterator,
        U::Item: Into<String>,
    {
        let mut set = Self::new();
        set.grammars
            .extend(values.into_iter().map(GrammarRef::Value));
        set.grammars
            .extend(urls.into_iter().map(|url| GrammarRef::Url(url.into())));
        set
    }

    pub fn single(grammar: impl Into<GrammarRef>) -> Self {
        Self {
            grammars: vec![grammar.into()],
        }
    }

    pub fn push(&mut self, grammar: impl Into<GrammarRef>) {
        self.grammars.push(grammar.into());
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Whether the set should be passed singularly rather than as a list.
    pub fn is_single(&self) -> bool {
        self.grammars.len() == 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GrammarRef> {
        self.grammars.iter()
    }

    /// The input mode implied by the inline grammars in the set.
    ///
    /// `Any` when they span more than one mode, the shared mode otherwise,
    /// and `None` when the set holds only URLs (or nothing).
    pub fn effective_mode(&self) -> Option<InputMode> {
        let mut modes: Vec<InputMode> = Vec::new();
        for mode in self.grammars.iter().filter_map(GrammarRef::mode) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        match modes.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => Some(InputMode::Any),
        }
    }
}

impl<'a> IntoIterator for &'a GrammarSet {
    type Item = &'a GrammarRef;
    type IntoIter = std::slice::Iter<'a, GrammarRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.grammars.iter()
    }
}

/// Serialises as `{"grammar": ...}` for a single entry and
/// `{"grammars": [...]}` otherwise, which is how input components expect it.
impl Serialize for GrammarSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1))?;
        if let [only] = self.grammars.as_slice() {
            map.serialize_entry("grammar", only)?;
        } else {
            map.serialize_entry("grammars", &self.grammars)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{digit_grammar, literal_options_grammar};

    #[test]
    fn single_mode_set() {
        let set = GrammarSet::merge([digit_grammar(Some(3), None).unwrap()], Vec::<String>::new());
        assert!(set.is_single());
        assert_eq!(set.effective_mode(), Some(InputMode::Dtmf));
    }

    #[test]
    fn mixed_modes_become_any() {
        let speech = literal_options_grammar(["yes", "no"], None).unwrap();
        let dtmf = digit_grammar(Some(1), None).unwrap();
        let set = GrammarSet::merge([speech, dtmf], ["http://example.com/cities.grxml"]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_single());
        assert_eq!(set.effective_mode(), Some(InputMode::Any));
    }

    #[test]
    fn url_only_set_has_no_mode() {
        let set = GrammarSet::merge(
            Vec::<Grammar>::new(),
            ["http://example.com/cities.grxml", "http://example.com/states.grxml"],
        );
        assert_eq!(set.effective_mode(), None);
    }

    #[test]
    fn inline_grammars_precede_urls() {
        let dtmf = digit_grammar(Some(5), None).unwrap();
        let set = GrammarSet::merge([dtmf.clone()], ["http://example.com/cities.grxml"]);
        let refs: Vec<_> = set.iter().cloned().collect();
        assert_eq!(
            refs,
            vec![
                GrammarRef::Value(dtmf),
                GrammarRef::Url("http://example.com/cities.grxml".to_string()),
            ]
        );
    }

    #[test]
    fn serializes_single_and_list_shapes() {
        let single = GrammarSet::single(GrammarRef::Url("http://a/b.grxml".into()));
        let json = serde_json::to_value(&single).unwrap();
        assert_eq!(json["grammar"]["url"], "http://a/b.grxml");

        let many = GrammarSet::merge(Vec::<Grammar>::new(), ["http://a", "http://b"]);
        let json = serde_json::to_value(&many).unwrap();
        assert_eq!(json["grammars"][1]["url"], "http://b");
    }
}
