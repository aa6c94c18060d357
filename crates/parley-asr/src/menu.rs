//! Multi-attempt menus with per-option dispatch.
//!
//! Options are declared on a [`MenuBuilder`] and compiled into a [`Menu`],
//! which owns the tagged grammar and the retry state for a single `menu`
//! call. Option `i` is tagged `i` in the grammar, so a match is dispatched
//! by a direct lookup of its tag. When two options accept the same input
//! the earlier one wins; that is settled when the grammar is built.

use crate::error::AsrError;
use crate::executor::{ExecuteOptions, InteractionExecutor};
use crate::session::Session;
use parley_grammar::{tagged_menu_grammar, Grammar, GrammarRef, GrammarSet, Keys};
use parley_types::{CompletionStatus, InputMode, InteractionResult, OutputDocument};
use serde_json::Value;

/// The caller-side object handlers act on.
pub trait MenuContext {
    /// Hands the call to another interaction, passing the matched input as
    /// its extension.
    fn invoke(&mut self, target: &str, extension: &str);
}

type MatchHandler<C> = Box<dyn FnMut(&mut C, &str) + Send>;
type InvalidHandler<C> = Box<dyn FnMut(&mut C, Option<&str>) + Send>;
type Hook<C> = Box<dyn FnMut(&mut C) + Send>;

enum Payload<C> {
    Handler(MatchHandler<C>),
    Invoke(String),
}

struct Matcher<C> {
    keys: Keys,
    payload: Payload<C>,
}

/// Collects menu options and callbacks.
pub struct MenuBuilder<C> {
    matchers: Vec<Matcher<C>>,
    invalid: Option<InvalidHandler<C>>,
    timeout: Option<Hook<C>>,
    failure: Option<Hook<C>>,
}

impl<C> Default for MenuBuilder<C> {
    fn default() -> Self {
        Self {
            matchers: Vec::new(),
            invalid: None,
            timeout: None,
            failure: None,
        }
    }
}

impl<C: MenuContext> MenuBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option whose handler receives the matched input.
    pub fn on_match<K, F>(&mut self, keys: K, handler: F) -> &mut Self
    where
        K: Into<Keys>,
        F: FnMut(&mut C, &str) + Send + 'static,
    {
        self.matchers.push(Matcher {
            keys: keys.into(),
            payload: Payload::Handler(Box::new(handler)),
        });
        self
    }

    /// Adds an option that invokes `target` through [`MenuContext::invoke`].
    pub fn on_match_invoke<K: Into<Keys>>(&mut self, keys: K, target: impl Into<String>) -> &mut Self {
        self.matchers.push(Matcher {
            keys: keys.into(),
            payload: Payload::Invoke(target.into()),
        });
        self
    }

    /// Runs after an attempt that matched no option.
    pub fn invalid<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, Option<&str>) + Send + 'static,
    {
        self.invalid = Some(Box::new(handler));
        self
    }

    /// Runs after an attempt that got no input.
    pub fn timeout<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.timeout = Some(Box::new(handler));
        self
    }

    /// Runs once, after the last attempt fails.
    pub fn failure<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.failure = Some(Box::new(handler));
        self
    }

    /// Compiles the menu. Fails before any interaction when no option was declared.
    pub fn build(self, mode: InputMode, max_tries: u32) -> Result<Menu<C>, AsrError> {
        if self.matchers.is_empty() {
            return Err(AsrError::Configuration(
                "You must specify one or more matches.".to_string(),
            ));
        }
        let grammar = tagged_menu_grammar(self.matchers.iter().map(|m| &m.keys), mode)?;
        Ok(Menu {
            grammars: GrammarSet::single(grammar),
            matchers: self.matchers,
            invalid: self.invalid,
            timeout: self.timeout,
            failure: self.failure,
            state: MenuState::Idle,
            attempt: 0,
            max_tries: max_tries.max(1),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    Attempting,
    Retrying,
    /// An option matched and was dispatched.
    Resolved,
    /// All tries were used without a match.
    Exhausted,
    /// The call hung up or collection was stopped.
    Ended,
}

/// How a `menu` call finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Matched { index: usize, response: String },
    Exhausted,
    Hangup,
    Stopped,
}

/// What the engine does after one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStep {
    Retry,
    Done(MenuOutcome),
}

pub struct Menu<C> {
    grammars: GrammarSet,
    matchers: Vec<Matcher<C>>,
    invalid: Option<InvalidHandler<C>>,
    timeout: Option<Hook<C>>,
    failure: Option<Hook<C>>,
    state: MenuState,
    attempt: u32,
    max_tries: u32,
}

impl<C: MenuContext> Menu<C> {
    pub fn grammar(&self) -> Option<&Grammar> {
        self.grammars.iter().find_map(|g| match g {
            GrammarRef::Value(grammar) => Some(grammar),
            GrammarRef::Url(_) => None,
        })
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The current attempt, starting at 1.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Drives attempts until the menu resolves, is exhausted or the call ends.
    ///
    /// Attempts run strictly one after another with the same grammar.
    /// Transport errors propagate immediately and are never retried.
    pub async fn run<S: Session + ?Sized>(
        &mut self,
        ctx: &mut C,
        executor: &InteractionExecutor<'_, S>,
        document: &OutputDocument,
        options: &ExecuteOptions,
    ) -> Result<MenuOutcome, AsrError> {
        self.start();
        loop {
            let result = executor
                .execute(document, self.grammars.clone(), options)
                .await
                .inspect_err(|_| self.state = MenuState::Ended)?;

            match self.process(ctx, &result) {
                MenuStep::Retry => self.state = MenuState::Attempting,
                MenuStep::Done(outcome) => return Ok(outcome),
            }
        }
    }

    /// Resets to the first attempt.
    pub fn start(&mut self) {
        self.attempt = 1;
        self.state = MenuState::Attempting;
    }

    /// Applies the result of the current attempt.
    pub fn process(&mut self, ctx: &mut C, result: &InteractionResult) -> MenuStep {
        tracing::debug!(attempt = self.attempt, status = %result.status(), "menu attempt completed");
        match result.status() {
            CompletionStatus::Match => match result.interpretation().and_then(|v| self.option_index(v)) {
                Some(index) => self.dispatch(ctx, index, result.response().unwrap_or_default()),
                None => {
                    tracing::warn!(
                        interpretation = ?result.interpretation(),
                        "match did not identify a menu option, treating as invalid"
                    );
                    self.on_invalid(ctx, result.response())
                }
            },
            CompletionStatus::NoMatch => self.on_invalid(ctx, result.response()),
            CompletionStatus::NoInput => {
                if let Some(timeout) = self.timeout.as_mut() {
                    timeout(ctx);
                }
                self.next_attempt(ctx)
            }
            CompletionStatus::Hangup => self.end(MenuOutcome::Hangup),
            CompletionStatus::Stop => self.end(MenuOutcome::Stopped),
        }
    }

    fn option_index(&self, interpretation: &Value) -> Option<usize> {
        let index = match interpretation {
            Value::String(tag) => tag.trim().parse::<usize>().ok()?,
            Value::Number(tag) => usize::try_from(tag.as_u64()?).ok()?,
            _ => return None,
        };
        (index < self.matchers.len()).then_some(index)
    }

    fn dispatch(&mut self, ctx: &mut C, index: usize, response: &str) -> MenuStep {
        tracing::info!(attempt = self.attempt, option = index, "menu option matched");
        match &mut self.matchers[index].payload {
            Payload::Handler(handler) => handler(ctx, response),
            Payload::Invoke(target) => ctx.invoke(target, response),
        }
        self.state = MenuState::Resolved;
        MenuStep::Done(MenuOutcome::Matched {
            index,
            response: response.to_string(),
        })
    }

    fn on_invalid(&mut self, ctx: &mut C, response: Option<&str>) -> MenuStep {
        if let Some(invalid) = self.invalid.as_mut() {
            invalid(ctx, response);
        }
        self.next_attempt(ctx)
    }

    fn next_attempt(&mut self, ctx: &mut C) -> MenuStep {
        if self.attempt < self.max_tries {
            self.attempt += 1;
            self.state = MenuState::Retrying;
            return MenuStep::Retry;
        }
        self.state = MenuState::Exhausted;
        tracing::info!(attempts = self.attempt, "menu exhausted");
        if let Some(failure) = self.failure.as_mut() {
            failure(ctx);
        }
        MenuStep::Done(MenuOutcome::Exhausted)
    }

    fn end(&mut self, outcome: MenuOutcome) -> MenuStep {
        self.state = MenuState::Ended;
        MenuStep::Done(outcome)
    }
}
