//! A scripted walk through the three caller-facing interactions.

use crate::config::Config;
use parley_asr::testing::ScriptedSession;
use parley_asr::{
    AskOptions, AsrController, AsrError, ListenOptions, MenuContext, MenuOptions, MenuOutcome,
    Session,
};
use parley_types::{InteractionResult, OutputDocument, Prompt};

/// Departments offered by the `listen` step.
pub const DEPARTMENTS: [&str; 3] = ["sales", "support", "billing"];

/// What each step of the demo produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub account: InteractionResult,
    pub department: InteractionResult,
    pub menu: MenuOutcome,
    /// Everything the menu handlers did, in order.
    pub desk: Vec<String>,
}

/// Records menu activity instead of transferring a real call.
#[derive(Debug, Default)]
pub struct DemoDesk {
    pub log: Vec<String>,
}

impl MenuContext for DemoDesk {
    fn invoke(&mut self, target: &str, extension: &str) {
        tracing::info!(target_name = target, extension, "handing call over");
        self.log.push(format!("invoke {target} extension={extension}"));
    }
}

/// Runs the demo against a [`ScriptedSession`] built from `config.script`.
///
/// # Errors
///
/// Returns `AsrError` when an interaction fails, including
/// [`AsrError::SessionGone`] once the script has run out.
pub async fn run(config: &Config) -> Result<DemoReport, AsrError> {
    let session = ScriptedSession::with_script(config.script.iter().cloned());
    run_on(&session, config).await
}

/// Runs the demo on any session.
///
/// # Errors
///
/// Returns `AsrError` when an interaction fails.
pub async fn run_on<S: Session + ?Sized>(session: &S, config: &Config) -> Result<DemoReport, AsrError> {
    let controller = AsrController::new(session, config.asr.clone());

    let account = controller
        .ask(
            &OutputDocument::from_iter([Prompt::text(
                "Enter your account number, then press pound.",
            )]),
            &AskOptions {
                limit: Some(10),
                terminator: Some("#".to_string()),
                ..AskOptions::default()
            },
        )
        .await?;
    tracing::info!(status = %account.status(), response = %account, "account collected");

    let department = controller
        .listen(&ListenOptions {
            prompt: OutputDocument::from_iter([Prompt::text(
                "Which department would you like? Sales, support or billing.",
            )]),
            options: DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
            ..ListenOptions::default()
        })
        .await?;
    tracing::info!(status = %department.status(), response = %department, "department chosen");

    let mut desk = DemoDesk::default();
    let menu = controller
        .menu(
            &OutputDocument::from_iter([Prompt::text(
                "Press 1 for opening hours, 2 to hear your balance, 3 for billing.",
            )]),
            &MenuOptions {
                tries: 3,
                ..MenuOptions::default()
            },
            &mut desk,
            |menu| {
                menu.on_match(1, |desk: &mut DemoDesk, _: &str| {
                    desk.log.push("opening hours".to_string());
                })
                .on_match(2, |desk: &mut DemoDesk, _: &str| {
                    desk.log.push("balance".to_string());
                })
                .on_match_invoke(3, "billing")
                .invalid(|desk: &mut DemoDesk, response: Option<&str>| {
                    desk.log.push(format!("invalid {}", response.unwrap_or("-")));
                })
                .timeout(|desk: &mut DemoDesk| desk.log.push("timeout".to_string()))
                .failure(|desk: &mut DemoDesk| desk.log.push("failure".to_string()));
            },
        )
        .await?;
    tracing::info!(outcome = ?menu, "menu finished");

    Ok(DemoReport {
        account,
        department,
        menu,
        desk: desk.log,
    })
}
