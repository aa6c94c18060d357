//! Operations submitted to the transport and handles to the components
//! that run them.
//!
//! A submitted [`Operation`] becomes a running component. The caller holds a
//! [`ComponentHandle`] and can wait for the completion event or request a
//! stop. The transport side holds the matching [`ComponentCompleter`] and
//! reports exactly one completion event.

use parley_grammar::GrammarSet;
use parley_types::{CompletionEvent, InputMode, OutputDocument};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use uuid::Uuid;

/// A component timeout.
///
/// Configured in seconds, carried to the transport in milliseconds. Waiting
/// indefinitely is its own variant; a zero duration is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    Indefinite,
    After(Duration),
}

impl Timeout {
    /// Scaling from configured seconds to transport milliseconds.
    pub const MILLIS_PER_SECOND: u64 = 1000;

    /// `0` means indefinite.
    pub fn from_seconds(seconds: u64) -> Self {
        Self::from_millis(seconds.saturating_mul(Self::MILLIS_PER_SECOND))
    }

    /// `0` means indefinite.
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Self::Indefinite
        } else {
            Self::After(Duration::from_millis(millis))
        }
    }

    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::Indefinite => None,
            Self::After(duration) => Some(duration),
        }
    }

    /// Wire value: milliseconds, or `-1` for indefinite.
    pub fn as_millis(self) -> i64 {
        match self {
            Self::Indefinite => -1,
            Self::After(duration) => i64::try_from(duration.as_millis()).unwrap_or(i64::MAX),
        }
    }
}

impl Serialize for Timeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for Timeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Ok(u64::try_from(millis).map_or(Self::Indefinite, Self::from_millis))
    }
}

/// Parameters of an input (collection) component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputOptions {
    pub mode: InputMode,
    #[serde(flatten)]
    pub grammars: GrammarSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_timeout: Option<Timeout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inter_digit_timeout: Option<Timeout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_silence: Option<Timeout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,
}

impl InputOptions {
    pub fn new(mode: InputMode, grammars: GrammarSet) -> Self {
        Self {
            mode,
            grammars,
            initial_timeout: None,
            inter_digit_timeout: None,
            max_silence: None,
            min_confidence: None,
            recognizer: None,
            language: None,
            terminator: None,
            sensitivity: None,
        }
    }

    /// Applies caller overrides. Every field set in `overrides` wins.
    pub fn apply(&mut self, overrides: &InputOverrides) {
        let o = overrides.clone();
        if let Some(mode) = o.mode {
            self.mode = mode;
        }
        self.initial_timeout = o.initial_timeout.or(self.initial_timeout);
        self.inter_digit_timeout = o.inter_digit_timeout.or(self.inter_digit_timeout);
        self.max_silence = o.max_silence.or(self.max_silence);
        self.min_confidence = o.min_confidence.or(self.min_confidence);
        self.recognizer = o.recognizer.or(self.recognizer.take());
        self.language = o.language.or(self.language.take());
        self.terminator = o.terminator.or(self.terminator.take());
        self.sensitivity = o.sensitivity.or(self.sensitivity);
    }
}

/// Raw input parameters supplied per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputOverrides {
    #[serde(default)]
    pub mode: Option<InputMode>,
    #[serde(default)]
    pub initial_timeout: Option<Timeout>,
    #[serde(default)]
    pub inter_digit_timeout: Option<Timeout>,
    #[serde(default)]
    pub max_silence: Option<Timeout>,
    #[serde(default)]
    pub min_confidence: Option<f64>,
    #[serde(default)]
    pub recognizer: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub terminator: Option<String>,
    #[serde(default)]
    pub sensitivity: Option<f64>,
}

/// Parameters of an output (playback) component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    pub document: OutputDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<Timeout>,
}

impl OutputOptions {
    pub fn new(document: OutputDocument) -> Self {
        Self {
            document,
            renderer: None,
            voice: None,
            max_time: None,
        }
    }

    pub fn apply(&mut self, overrides: &OutputOverrides) {
        let o = overrides.clone();
        self.renderer = o.renderer.or(self.renderer.take());
        self.voice = o.voice.or(self.voice.take());
        self.max_time = o.max_time.or(self.max_time);
    }
}

/// Raw output parameters supplied per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOverrides {
    #[serde(default)]
    pub renderer: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub max_time: Option<Timeout>,
}

/// Something the transport can run on the call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Output(OutputOptions),
    Input(InputOptions),
    /// Output and input run as one component. With `barge_in` set, input
    /// interrupts the playback.
    Prompt {
        output: OutputOptions,
        input: InputOptions,
        barge_in: bool,
    },
}

impl Operation {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Output(_) => ComponentKind::Output,
            Self::Input(_) => ComponentKind::Input,
            Self::Prompt { .. } => ComponentKind::Prompt,
        }
    }

    /// The collection half of the operation, if it collects input.
    pub fn input(&self) -> Option<&InputOptions> {
        match self {
            Self::Output(_) => None,
            Self::Input(input) | Self::Prompt { input, .. } => Some(input),
        }
    }

    /// The playback half of the operation, if it plays output.
    pub fn output(&self) -> Option<&OutputOptions> {
        match self {
            Self::Input(_) => None,
            Self::Output(output) | Self::Prompt { output, .. } => Some(output),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Output,
    Input,
    Prompt,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Input => "input",
            Self::Prompt => "prompt",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Shared {
    id: Uuid,
    kind: ComponentKind,
    stop_requested: AtomicBool,
    stop: Notify,
}

/// Creates the two ends of a freshly submitted component.
pub fn component_pair(kind: ComponentKind) -> (ComponentHandle, ComponentCompleter) {
    let (sender, receiver) = watch::channel(None);
    let shared = Arc::new(Shared {
        id: Uuid::new_v4(),
        kind,
        stop_requested: AtomicBool::new(false),
        stop: Notify::new(),
    });
    (
        ComponentHandle {
            shared: Arc::clone(&shared),
            events: receiver,
        },
        ComponentCompleter {
            shared,
            events: sender,
        },
    )
}

/// Caller-side view of a running component.
#[derive(Clone)]
pub struct ComponentHandle {
    shared: Arc<Shared>,
    events: watch::Receiver<Option<CompletionEvent>>,
}

impl ComponentHandle {
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.shared.kind
    }

    pub fn is_complete(&self) -> bool {
        self.events.borrow().is_some()
    }

    pub fn stop_requested(&self) -> bool {
        self.shared.stop_requested.load(Ordering::SeqCst)
    }

    /// Asks the transport to stop the component.
    ///
    /// Returns `true` only when this call issued the stop. Stopping a
    /// completed or already-stopping component does nothing.
    pub fn stop(&self) -> bool {
        if self.is_complete() {
            return false;
        }
        if self.shared.stop_requested.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!(component_id = %self.shared.id, kind = %self.shared.kind, "stopping component");
        self.shared.stop.notify_one();
        true
    }

    /// Waits for the completion event.
    ///
    /// If the transport drops the component without completing it, the
    /// session is treated as gone and this resolves to [`CompletionEvent::Hangup`].
    pub async fn wait(&self) -> CompletionEvent {
        let mut events = self.events.clone();
        loop {
            let current = events.borrow_and_update().clone();
            if let Some(event) = current {
                return event;
            }
            if events.changed().await.is_err() {
                let last = events.borrow().clone();
                return last.unwrap_or(CompletionEvent::Hangup);
            }
        }
    }
}

impl std::fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("id", &self.shared.id)
            .field("kind", &self.shared.kind)
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// Transport-side end of a component.
pub struct ComponentCompleter {
    shared: Arc<Shared>,
    events: watch::Sender<Option<CompletionEvent>>,
}

impl ComponentCompleter {
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.shared.kind
    }

    pub fn is_complete(&self) -> bool {
        self.events.borrow().is_some()
    }

    pub fn stop_requested(&self) -> bool {
        self.shared.stop_requested.load(Ordering::SeqCst)
    }

    /// Resolves once a stop has been requested.
    pub async fn stopped(&self) {
        loop {
            if self.stop_requested() {
                return;
            }
            self.shared.stop.notified().await;
        }
    }

    /// Reports the completion event. Only the first call has any effect.
    pub fn complete(&self, event: CompletionEvent) -> bool {
        let mut first = false;
        self.events.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(event);
            first = true;
            true
        });
        first
    }
}
