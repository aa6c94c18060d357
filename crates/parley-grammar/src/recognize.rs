//! A reference recogniser for the grammars this crate builds.
//!
//! Real recognition happens in the external speech/DTMF engine. This module
//! exists so grammar acceptance can be checked in-process and so simulated
//! sessions can turn raw input into tagged matches. Alternatives are
//! explored in document order and parses are reported in that order, which
//! is the same contract the external engine is expected to honour.

use crate::grammar::{Grammar, Item, Node, Repeat};
use parley_types::InputMode;

/// A complete parse of some input against a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    /// The input as tokenised for the grammar's mode.
    pub tokens: Vec<String>,
    /// Semantic tags collected along the parse, outermost first.
    pub tags: Vec<String>,
}

impl Recognition {
    /// The semantic instance for literal tag formats: the tags joined by a space.
    pub fn instance(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(" "))
        }
    }
}

/// Returns the first complete parse of `input`, if the grammar accepts it.
pub fn recognize(grammar: &Grammar, input: &str) -> Option<Recognition> {
    recognize_all(grammar, input).into_iter().next()
}

/// Returns every distinct complete parse of `input`, in document order.
pub fn recognize_all(grammar: &Grammar, input: &str) -> Vec<Recognition> {
    let Some(rule) = grammar.root_rule() else {
        return Vec::new();
    };
    let tokens = tokenize(input, grammar.mode);
    let matcher = Matcher {
        tokens: &tokens,
        mode: grammar.mode,
    };

    let mut out: Vec<Recognition> = Vec::new();
    for parse in matcher.sequence(&rule.body, Parse::default()) {
        if parse.pos != tokens.len() {
            continue;
        }
        let recognition = Recognition {
            tokens: tokens.clone(),
            tags: parse.tags,
        };
        if !out.contains(&recognition) {
            out.push(recognition);
        }
    }
    out
}

/// Cuts keypad input at the first occurrence of the terminator.
pub fn strip_terminator<'a>(input: &'a str, terminator: Option<&str>) -> &'a str {
    match terminator.filter(|t| !t.is_empty()) {
        Some(terminator) => match input.find(terminator) {
            Some(at) => &input[..at],
            None => input,
        },
        None => input,
    }
}

fn tokenize(text: &str, mode: InputMode) -> Vec<String> {
    match mode {
        InputMode::Dtmf => text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect(),
        InputMode::Speech | InputMode::Any => {
            text.split_whitespace().map(str::to_string).collect()
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Parse {
    pos: usize,
    tags: Vec<String>,
}

struct Matcher<'a> {
    tokens: &'a [String],
    mode: InputMode,
}

impl Matcher<'_> {
    fn sequence(&self, nodes: &[Node], start: Parse) -> Vec<Parse> {
        let mut frontier = vec![start];
        for node in nodes {
            let mut next = Vec::new();
            for parse in &frontier {
                next.extend(self.node(node, parse));
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }
        frontier
    }

    fn node(&self, node: &Node, parse: &Parse) -> Vec<Parse> {
        match node {
            Node::Text(text) => self
                .literal(&tokenize(text, self.mode), parse)
                .into_iter()
                .collect(),
            Node::Tag(tag) => {
                let mut tagged = parse.clone();
                tagged.tags.push(tag.clone());
                vec![tagged]
            }
            Node::Item(item) => self.item(item, parse),
            Node::OneOf(items) => items
                .iter()
                .flat_map(|item| self.item(item, parse))
                .collect(),
        }
    }

    fn literal(&self, words: &[String], parse: &Parse) -> Option<Parse> {
        let end = parse.pos + words.len();
        let actual = self.tokens.get(parse.pos..end)?;
        let equal = words
            .iter()
            .zip(actual)
            .all(|(expected, got)| self.token_eq(expected, got));
        equal.then(|| Parse {
            pos: end,
            tags: parse.tags.clone(),
        })
    }

    fn item(&self, item: &Item, parse: &Parse) -> Vec<Parse> {
        let repeat = item.repeat.unwrap_or(Repeat {
            min: 1,
            max: Some(1),
        });
        // Unbounded repeats must consume input on every pass or they never end.
        let must_advance = repeat.max.is_none();

        let mut accepted = Vec::new();
        let mut frontier = vec![parse.clone()];
        let mut count = 0u32;
        loop {
            if count >= repeat.min {
                accepted.extend(frontier.iter().cloned());
            }
            if repeat.max.is_some_and(|max| count >= max) {
                break;
            }

            let mut next = Vec::new();
            for current in &frontier {
                for candidate in self.sequence(&item.body, current.clone()) {
                    if !must_advance || candidate.pos > current.pos {
                        next.push(candidate);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
            count += 1;
        }
        accepted
    }

    fn token_eq(&self, expected: &str, got: &str) -> bool {
        match self.mode {
            InputMode::Dtmf => expected == got,
            InputMode::Speech | InputMode::Any => expected.eq_ignore_ascii_case(got),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_terminator() {
        assert_eq!(strip_terminator("123#45", Some("#")), "123");
        assert_eq!(strip_terminator("123", Some("#")), "123");
        assert_eq!(strip_terminator("12#", None), "12#");
        assert_eq!(strip_terminator("12#", Some("")), "12#");
    }

    #[test]
    fn instance_joins_tags() {
        let recognition = Recognition {
            tokens: vec!["1".into()],
            tags: vec!["2".into()],
        };
        assert_eq!(recognition.instance().as_deref(), Some("2"));
        let untagged = Recognition {
            tokens: vec![],
            tags: vec![],
        };
        assert_eq!(untagged.instance(), None);
    }
}
