//! Prompt-and-collect interactions for Parley.
//!
//! Drives voice interactions over a call [`Session`]: plays prompts,
//! collects DTMF or speech input against a grammar and interprets the
//! completion. The caller-facing surface is [`AsrController`], with
//! [`ask`](AsrController::ask) for single digit or grammar collection,
//! [`listen`](AsrController::listen) for option lists with barge-in, and
//! [`menu`](AsrController::menu) for retried, dispatched menus.
//!
//! The telephony transport is a collaborator behind [`Session`]; speech
//! recognition and audio rendering are out of scope. [`testing`] provides
//! a scripted session for tests and demos.

pub mod component;
pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod menu;
pub mod session;
pub mod testing;

pub use component::{
    component_pair, ComponentCompleter, ComponentHandle, ComponentKind, InputOptions,
    InputOverrides, Operation, OutputOptions, OutputOverrides, Timeout,
};
pub use config::AsrConfig;
pub use controller::{AskOptions, AsrController, ListenOptions, MenuOptions};
pub use error::AsrError;
pub use executor::{ExecuteOptions, InteractionExecutor, Strategy};
pub use interpreter::{interpret, normalize_dtmf, ErrorFlavor};
pub use menu::{Menu, MenuBuilder, MenuContext, MenuOutcome, MenuState, MenuStep};
pub use session::{Deferred, Session, TaskScope};
