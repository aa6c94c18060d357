//! A deterministic in-memory [`Session`].
//!
//! [`ScriptedSession`] answers each collection with the next scripted step
//! and records everything submitted to it, so engine behaviour can be
//! checked without a telephony stack.

use crate::component::{component_pair, ComponentCompleter, ComponentHandle, Operation};
use crate::error::AsrError;
use crate::session::{Deferred, Session, TaskScope};
use async_trait::async_trait;
use parley_grammar::{recognize_all, strip_terminator, GrammarRef};
use parley_types::{CompletionEvent, InputMode, Interpretation, MatchReason, Nlsml};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// How the simulated caller responds to one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scripted {
    /// Complete the collection with exactly this event.
    Event(CompletionEvent),
    /// The caller types or says this, matched against the submitted grammars.
    Caller(String),
    /// Nothing happens until the component is stopped.
    Unanswered,
}

#[derive(Default)]
struct State {
    script: VecDeque<Scripted>,
    operations: Vec<Operation>,
    handles: Vec<ComponentHandle>,
    hold_output: bool,
}

/// A [`Session`] that replays a script.
///
/// When the script runs out, further collections end in a hangup.
pub struct ScriptedSession {
    state: Mutex<State>,
    alive: AtomicBool,
    tasks: TaskScope,
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            alive: AtomicBool::new(true),
            tasks: TaskScope::new(),
        }
    }

    pub fn with_script<I: IntoIterator<Item = Scripted>>(script: I) -> Self {
        let session = Self::new();
        session.state().script.extend(script);
        session
    }

    pub fn push(&self, step: Scripted) -> &Self {
        self.state().script.push_back(step);
        self
    }

    pub fn push_event(&self, event: CompletionEvent) -> &Self {
        self.push(Scripted::Event(event))
    }

    pub fn push_caller(&self, input: impl Into<String>) -> &Self {
        self.push(Scripted::Caller(input.into()))
    }

    /// Keeps standalone output playing until it is stopped.
    pub fn hold_output(&self, hold: bool) -> &Self {
        self.state().hold_output = hold;
        self
    }

    /// Ends the call.
    pub fn hangup(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.tasks.shutdown();
    }

    /// Every operation submitted so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Handles of every component started so far, in submission order.
    pub fn handles(&self) -> Vec<ComponentHandle> {
        self.state().handles.clone()
    }

    /// Script steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.state().script.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn park_until_stopped(&self, completer: ComponentCompleter) {
        self.tasks.spawn(async move {
            completer.stopped().await;
            completer.complete(CompletionEvent::Stop);
        });
    }

    fn answer(&self, operation: &Operation, completer: ComponentCompleter) {
        let Some(input) = operation.input() else {
            if self.state().hold_output {
                self.park_until_stopped(completer);
            } else {
                completer.complete(CompletionEvent::Finish);
            }
            return;
        };

        let step = self.state().script.pop_front();
        match step {
            Some(Scripted::Event(event)) => {
                completer.complete(event);
            }
            Some(Scripted::Caller(text)) => {
                let text = strip_terminator(&text, input.terminator.as_deref());
                completer.complete(simulate(input.grammars.iter(), text));
            }
            Some(Scripted::Unanswered) => self.park_until_stopped(completer),
            None => {
                tracing::debug!("script exhausted, hanging up");
                self.alive.store(false, Ordering::SeqCst);
                completer.complete(CompletionEvent::Hangup);
            }
        }
    }
}

#[async_trait]
impl Session for ScriptedSession {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn write_and_await(&self, operation: Operation) -> Result<ComponentHandle, AsrError> {
        if !self.is_alive() {
            return Err(AsrError::SessionGone);
        }
        let (handle, completer) = component_pair(operation.kind());
        {
            let mut state = self.state();
            state.operations.push(operation.clone());
            state.handles.push(handle.clone());
        }
        self.answer(&operation, completer);
        Ok(handle)
    }

    fn schedule_after(&self, delay: Duration, task: Deferred) {
        if self.is_alive() {
            self.tasks.spawn_after(delay, task);
        }
    }
}

/// Turns caller input into the event a recognizer would report.
///
/// The first inline grammar that accepts the input wins; every parse of it
/// becomes one interpretation, in document order.
fn simulate<'a, I>(grammars: I, text: &str) -> CompletionEvent
where
    I: IntoIterator<Item = &'a GrammarRef>,
{
    if text.trim().is_empty() {
        return CompletionEvent::NoInput;
    }

    for grammar in grammars {
        let GrammarRef::Value(grammar) = grammar else {
            continue;
        };
        let parses = recognize_all(grammar, text);
        if parses.is_empty() {
            continue;
        }

        let (utterance, mode) = match grammar.mode {
            InputMode::Dtmf => (tones(text), InputMode::Dtmf),
            InputMode::Speech | InputMode::Any => (text.trim().to_string(), InputMode::Speech),
        };
        let nlsml = parses.iter().fold(Nlsml::new(), |doc, parse| {
            let instance = parse
                .instance()
                .map_or_else(|| Value::from(text.trim()), Value::from);
            doc.with_interpretation(
                Interpretation::new(1.0)
                    .with_input(utterance.clone(), mode)
                    .with_instance(instance),
            )
        });
        return CompletionEvent::Match(MatchReason::new(nlsml));
    }

    CompletionEvent::NoMatch
}

/// Spells keypad input the way DTMF recognizers report it.
fn tones(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '*' => "dtmf-star".to_string(),
            '#' => "dtmf-pound".to_string(),
            other => format!("dtmf-{other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
