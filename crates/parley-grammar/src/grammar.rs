//! The grammar document model.
//!
//! Grammars are immutable once built and are shared by reference across
//! collection attempts. The model covers the subset of the rule-based XML
//! dialect the builders emit: rules, items with optional repeat ranges,
//! one-of alternatives, literal text and semantic tags.

use crate::error::GrammarError;
use parley_types::InputMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag format used by tagged menu grammars. Tag contents are literal values.
pub const SEMANTICS_LITERALS: &str = "semantics/1.0-literals";

/// A grammar describing the inputs acceptable for one collection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub mode: InputMode,
    /// Id of the rule recognition starts from.
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_format: Option<String>,
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn new(root: impl Into<String>, mode: InputMode) -> Self {
        Self {
            mode,
            root: root.into(),
            language: None,
            tag_format: None,
            rules: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_tag_format(mut self, tag_format: impl Into<String>) -> Self {
        self.tag_format = Some(tag_format.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rule named by `root`, falling back to the first rule.
    pub fn root_rule(&self) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.id == self.root)
            .or_else(|| self.rules.first())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = crate::render::to_xml(self).map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

/// Visibility of a rule to other grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Public,
    Private,
}

impl RuleScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// A named rule: a sequence of nodes that must all match in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub scope: RuleScope,
    pub body: Vec<Node>,
}

impl Rule {
    pub fn public(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope: RuleScope::Public,
            body: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.body.push(node);
        self
    }
}

/// One element of a rule or item body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Literal tokens the caller must produce.
    Text(String),
    /// A grouped sequence, optionally repeated.
    Item(Item),
    /// Alternatives, tried in document order.
    OneOf(Vec<Item>),
    /// A semantic tag attached to the enclosing alternative. Consumes no input.
    Tag(String),
}

/// A grouped sequence of nodes with an optional repeat range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    pub body: Vec<Node>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            repeat: None,
            body: vec![Node::Text(text.into())],
        }
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.body.push(node);
        self
    }
}

/// How many times an item may repeat. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub min: u32,
    pub max: Option<u32>,
}

impl Repeat {
    /// A repeat from `min` to `max` inclusive; `None` means no upper bound.
    pub fn new(min: u32, max: Option<u32>) -> Result<Self, GrammarError> {
        if let Some(max) = max {
            if max < min {
                return Err(GrammarError::InvalidRepeat(format!("{min}-{max}")));
            }
        }
        Ok(Self { min, max })
    }

    /// Zero up to `max` repetitions (unbounded when `None`). Always valid.
    pub fn up_to(max: Option<u32>) -> Self {
        Self { min: 0, max }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-", self.min),
        }
    }
}
