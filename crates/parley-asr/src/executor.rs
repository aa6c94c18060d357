//! One playback-and-collection attempt against a session.

use crate::component::{
    ComponentHandle, InputOptions, InputOverrides, Operation, OutputOptions, OutputOverrides,
    Timeout,
};
use crate::config::AsrConfig;
use crate::error::AsrError;
use crate::interpreter::{interpret, ErrorFlavor};
use crate::session::Session;
use parley_grammar::GrammarSet;
use parley_types::{CompletionEvent, InputMode, InteractionResult, OutputDocument};
use std::time::Duration;

/// How prompts and collection are submitted when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// A single prompt component; barge-in is a flag on it.
    #[default]
    Combined,
    /// Separate output and input components. Completing the input stops
    /// the output if it is still playing.
    Independent,
}

/// Per-attempt parameters.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Input mode used when the grammars do not imply one.
    pub mode: Option<InputMode>,
    /// Sets the initial, inter-digit and max-silence timeouts together.
    pub collection_timeout: Option<Timeout>,
    pub terminator: Option<String>,
    /// Whether caller input may interrupt the prompt.
    pub interruptible: bool,
    pub strategy: Strategy,
    /// Forces a stop of the input component once elapsed.
    pub hard_timeout: Option<Duration>,
    pub flavor: ErrorFlavor,
    pub input: InputOverrides,
    pub output: OutputOverrides,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            mode: None,
            collection_timeout: None,
            terminator: None,
            interruptible: true,
            strategy: Strategy::Combined,
            hard_timeout: None,
            flavor: ErrorFlavor::Interaction,
            input: InputOverrides::default(),
            output: OutputOverrides::default(),
        }
    }
}

pub struct InteractionExecutor<'a, S: Session + ?Sized> {
    session: &'a S,
    config: &'a AsrConfig,
}

impl<'a, S: Session + ?Sized> InteractionExecutor<'a, S> {
    pub fn new(session: &'a S, config: &'a AsrConfig) -> Self {
        Self { session, config }
    }

    /// Runs exactly one attempt and interprets its completion.
    ///
    /// An empty `document` means no playback; only input is submitted.
    pub async fn execute(
        &self,
        document: &OutputDocument,
        grammars: GrammarSet,
        options: &ExecuteOptions,
    ) -> Result<InteractionResult, AsrError> {
        if !self.session.is_alive() {
            tracing::debug!("session ended before submission");
            return Err(AsrError::SessionGone);
        }

        let input = self.input_options(grammars, options);
        let event = if document.is_empty() {
            self.run(Operation::Input(input), options.hard_timeout).await?
        } else {
            let output = self.output_options(document, options);
            match options.strategy {
                Strategy::Combined => {
                    let prompt = Operation::Prompt {
                        output,
                        input,
                        barge_in: options.interruptible,
                    };
                    self.run(prompt, options.hard_timeout).await?
                }
                Strategy::Independent => self.run_independent(output, input, options).await?,
            }
        };

        tracing::debug!(reason = event.name(), "component completed");
        interpret(event, options.flavor)
    }

    /// Builds the input parameters: configured defaults, then per-attempt
    /// values, then caller overrides.
    pub fn input_options(&self, grammars: GrammarSet, options: &ExecuteOptions) -> InputOptions {
        let mode = grammars
            .effective_mode()
            .or(options.mode)
            .unwrap_or(InputMode::Dtmf);

        let mut input = InputOptions::new(mode, grammars);
        if let Some(timeout) = options.collection_timeout {
            input.initial_timeout = Some(timeout);
            input.inter_digit_timeout = Some(timeout);
            input.max_silence = Some(timeout);
        }
        input.min_confidence = Some(self.config.min_confidence);
        input.recognizer = self.config.recognizer.clone();
        input.language = self.config.input_language.clone();
        input.terminator = options.terminator.clone();
        input.apply(&options.input);
        input
    }

    pub fn output_options(&self, document: &OutputDocument, options: &ExecuteOptions) -> OutputOptions {
        let mut output = OutputOptions::new(document.clone());
        output.renderer = self.config.renderer.clone();
        output.voice = self.config.voice.clone();
        output.apply(&options.output);
        output
    }

    async fn run(&self, operation: Operation, hard_timeout: Option<Duration>) -> Result<CompletionEvent, AsrError> {
        match hard_timeout {
            None => self.session.submit_and_await(operation).await,
            Some(delay) => {
                let handle = self.session.write_and_await(operation).await?;
                self.arm_timeout(&handle, delay);
                Ok(handle.wait().await)
            }
        }
    }

    async fn run_independent(
        &self,
        output: OutputOptions,
        input: InputOptions,
        options: &ExecuteOptions,
    ) -> Result<CompletionEvent, AsrError> {
        let playback = self.session.write_and_await(Operation::Output(output)).await?;
        let collection = match self.session.write_and_await(Operation::Input(input)).await {
            Ok(handle) => handle,
            Err(err) => {
                playback.stop();
                return Err(err);
            }
        };
        if let Some(delay) = options.hard_timeout {
            self.arm_timeout(&collection, delay);
        }

        let event = collection.wait().await;
        if options.interruptible && playback.stop() {
            tracing::debug!(component_id = %playback.id(), "input completed, stopped output");
        }
        // The attempt is not over until its output has finished.
        playback.wait().await;
        Ok(event)
    }

    fn arm_timeout(&self, handle: &ComponentHandle, delay: Duration) {
        let handle = handle.clone();
        self.session.schedule_after(
            delay,
            Box::new(move || {
                if handle.stop() {
                    tracing::warn!(component_id = %handle.id(), "timeout triggered, halting input component");
                }
            }),
        );
    }
}
