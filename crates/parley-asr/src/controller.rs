//! Caller-facing prompt and collect operations.

use crate::component::{InputOverrides, OutputOverrides, Timeout};
use crate::config::AsrConfig;
use crate::error::AsrError;
use crate::executor::{ExecuteOptions, InteractionExecutor, Strategy};
use crate::interpreter::ErrorFlavor;
use crate::menu::{MenuBuilder, MenuContext, MenuOutcome};
use crate::session::Session;
use parley_grammar::{digit_grammar, literal_options_grammar, Grammar, GrammarRef, GrammarSet};
use parley_types::{InputMode, InteractionResult, OutputDocument};

/// Options for [`AsrController::ask`].
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Maximum number of digits to collect.
    pub limit: Option<u32>,
    /// Key that ends collection early.
    pub terminator: Option<String>,
    /// Seconds before the first and between each input. Defaults to the configured timeout.
    pub timeout: Option<u64>,
    pub grammars: Vec<Grammar>,
    pub grammar_urls: Vec<String>,
    /// Defaults to `true`.
    pub interruptible: Option<bool>,
    pub input: InputOverrides,
    pub output: OutputOverrides,
}

/// Options for [`AsrController::listen`].
///
/// Exactly one of `options`, `grammar` and `grammar_url` must be given.
/// Fine-grained timeouts are in milliseconds; `timeout` is in seconds.
#[derive(Debug, Clone, Default)]
pub struct ListenOptions {
    pub prompt: OutputDocument,
    pub options: Vec<String>,
    pub grammar: Option<Grammar>,
    pub grammar_url: Option<String>,
    pub language: Option<String>,
    pub mode: Option<InputMode>,
    pub max_silence: Option<u64>,
    pub min_confidence: Option<f64>,
    pub recognizer: Option<String>,
    pub terminator: Option<String>,
    pub sensitivity: Option<f64>,
    pub initial_timeout: Option<u64>,
    pub inter_digit_timeout: Option<u64>,
    /// Stops collection, and any prompt, after this many seconds. `Some(0)`
    /// disables it; `None` uses the configured timeout.
    pub timeout: Option<u64>,
}

/// Options for [`AsrController::menu`].
#[derive(Debug, Clone)]
pub struct MenuOptions {
    /// Attempts before giving up. At least 1.
    pub tries: u32,
    pub mode: InputMode,
    /// Seconds before the first and between each input. Defaults to the configured timeout.
    pub timeout: Option<u64>,
    /// Defaults to `true`.
    pub interruptible: Option<bool>,
    pub input: InputOverrides,
    pub output: OutputOverrides,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            tries: 1,
            mode: InputMode::Dtmf,
            timeout: None,
            interruptible: None,
            input: InputOverrides::default(),
            output: OutputOverrides::default(),
        }
    }
}

/// Runs interactions on one call session.
pub struct AsrController<'s, S: Session + ?Sized> {
    session: &'s S,
    config: AsrConfig,
}

impl<'s, S: Session + ?Sized> AsrController<'s, S> {
    pub fn new(session: &'s S, config: AsrConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &AsrConfig {
        &self.config
    }

    fn executor(&self) -> InteractionExecutor<'_, S> {
        InteractionExecutor::new(self.session, &self.config)
    }

    /// Plays `prompts` and collects input in a single attempt.
    ///
    /// Without explicit grammars a DTMF digit grammar is built from `limit`
    /// and `terminator`.
    ///
    /// # Errors
    ///
    /// [`AsrError::Configuration`] when none of limit, terminator, grammar
    /// or grammar URL is given; nothing is submitted in that case.
    /// [`AsrError::Interaction`] when the transport reports an error.
    pub async fn ask(&self, prompts: &OutputDocument, options: &AskOptions) -> Result<InteractionResult, AsrError> {
        let explicit = !options.grammars.is_empty() || !options.grammar_urls.is_empty();
        if !explicit && options.limit.is_none() && options.terminator.is_none() {
            return Err(AsrError::Configuration(
                "You must specify at least one of limit, terminator or grammar".to_string(),
            ));
        }

        let grammars = if explicit {
            GrammarSet::merge(options.grammars.iter().cloned(), options.grammar_urls.iter().cloned())
        } else {
            GrammarSet::single(digit_grammar(options.limit, options.terminator.as_deref())?)
        };

        let execute = ExecuteOptions {
            collection_timeout: Some(self.collection_timeout(options.timeout)),
            terminator: options.terminator.clone(),
            interruptible: options.interruptible.unwrap_or(true),
            strategy: Strategy::Combined,
            flavor: ErrorFlavor::Interaction,
            input: options.input.clone(),
            output: options.output.clone(),
            ..ExecuteOptions::default()
        };

        let result = self.executor().execute(prompts, grammars, &execute).await?;
        tracing::debug!(status = %result.status(), response = ?result.response(), "ask completed");
        Ok(result)
    }

    /// Collects input against an option list or grammar, optionally while
    /// playing a prompt that the input interrupts.
    ///
    /// # Errors
    ///
    /// [`AsrError::Configuration`] unless exactly one of options, grammar
    /// and grammar URL is given. [`AsrError::Listen`] when the transport
    /// reports an error.
    pub async fn listen(&self, options: &ListenOptions) -> Result<InteractionResult, AsrError> {
        let sources = [
            !options.options.is_empty(),
            options.grammar.is_some(),
            options.grammar_url.is_some(),
        ];
        match sources.iter().filter(|given| **given).count() {
            0 => {
                return Err(AsrError::Configuration(
                    "You must provide a grammar, a grammar URL or a set of options".to_string(),
                ))
            }
            1 => {}
            _ => {
                return Err(AsrError::Configuration(
                    "Provide only one of a grammar, a grammar URL or a set of options".to_string(),
                ))
            }
        }

        let grammar = if let Some(url) = &options.grammar_url {
            GrammarRef::Url(url.clone())
        } else if let Some(grammar) = &options.grammar {
            GrammarRef::Value(grammar.clone())
        } else {
            let language = options
                .language
                .as_deref()
                .or(self.config.input_language.as_deref());
            let mut grammar = literal_options_grammar(&options.options, language)?;
            if options.mode == Some(InputMode::Dtmf) {
                grammar = grammar.with_mode(InputMode::Dtmf);
            }
            GrammarRef::Value(grammar)
        };

        let input = InputOverrides {
            mode: options.mode,
            initial_timeout: options.initial_timeout.map(Timeout::from_millis),
            inter_digit_timeout: Some(
                options
                    .inter_digit_timeout
                    .map_or(self.config.inter_digit(), Timeout::from_millis),
            ),
            max_silence: options.max_silence.map(Timeout::from_millis),
            min_confidence: options.min_confidence,
            recognizer: options.recognizer.clone(),
            language: options.language.clone(),
            terminator: options.terminator.clone(),
            sensitivity: Some(options.sensitivity.unwrap_or(self.config.sensitivity)),
        };

        let hard_timeout = Timeout::from_seconds(options.timeout.unwrap_or(self.config.timeout));
        // A grammar URL alone implies no mode; listen collects speech then.
        let execute = ExecuteOptions {
            mode: Some(options.mode.unwrap_or(InputMode::Speech)),
            strategy: Strategy::Independent,
            hard_timeout: hard_timeout.duration(),
            flavor: ErrorFlavor::Listen,
            input,
            ..ExecuteOptions::default()
        };

        let result = self
            .executor()
            .execute(&options.prompt, GrammarSet::single(grammar), &execute)
            .await?;
        match result.response() {
            Some(response) => tracing::debug!(
                response,
                confidence = ?result.confidence(),
                "received input"
            ),
            None => tracing::debug!(status = %result.status(), "listen completed"),
        }
        Ok(result)
    }

    /// Plays `prompts` and dispatches the caller's choice to a handler,
    /// retrying up to `options.tries` times.
    ///
    /// `configure` declares the options on a fresh [`MenuBuilder`]. Handlers
    /// receive `ctx`.
    ///
    /// # Errors
    ///
    /// [`AsrError::Configuration`] when no option is declared,
    /// [`AsrError::SessionGone`] when the call has ended, and
    /// [`AsrError::Interaction`] when the transport reports an error.
    pub async fn menu<C, F>(
        &self,
        prompts: &OutputDocument,
        options: &MenuOptions,
        ctx: &mut C,
        configure: F,
    ) -> Result<MenuOutcome, AsrError>
    where
        C: MenuContext + Send,
        F: FnOnce(&mut MenuBuilder<C>),
    {
        let mut builder = MenuBuilder::new();
        configure(&mut builder);
        let mut menu = builder.build(options.mode, options.tries)?;

        let execute = ExecuteOptions {
            mode: Some(options.mode),
            collection_timeout: Some(self.collection_timeout(options.timeout)),
            interruptible: options.interruptible.unwrap_or(true),
            strategy: Strategy::Combined,
            flavor: ErrorFlavor::Interaction,
            input: options.input.clone(),
            output: options.output.clone(),
            ..ExecuteOptions::default()
        };

        menu.run(ctx, &self.executor(), prompts, &execute).await
    }

    fn collection_timeout(&self, seconds: Option<u64>) -> Timeout {
        seconds.map_or(self.config.collection_timeout(), Timeout::from_seconds)
    }
}
