use parley_asr::testing::ScriptedSession;
use parley_asr::{
    AsrConfig, AsrController, AsrError, MenuBuilder, MenuContext, MenuOptions, MenuOutcome,
    Operation, Timeout,
};
use parley_grammar::{tagged_menu_grammar, GrammarRef, Keys};
use parley_types::{
    CompletionEvent, InputMode, Interpretation, MatchReason, Nlsml, OutputDocument, Prompt,
};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Calls(Vec<String>);

impl Calls {
    fn record(&mut self, call: impl Into<String>) {
        self.0.push(call.into());
    }
}

impl MenuContext for Calls {
    fn invoke(&mut self, target: &str, extension: &str) {
        self.record(format!("invoke {target} extension={extension}"));
    }
}

fn prompts() -> OutputDocument {
    OutputDocument::from_iter([Prompt::text("Press 1 for sales, 2 for support.")])
}

fn tagged_match(input: &str, tag: &str) -> CompletionEvent {
    CompletionEvent::Match(MatchReason::new(Nlsml::new().with_interpretation(
        Interpretation::new(1.0)
            .with_input(input, InputMode::Dtmf)
            .with_instance(tag),
    )))
}

fn three_options(menu: &mut MenuBuilder<Calls>) {
    menu.on_match(2, |c: &mut Calls, r: &str| c.record(format!("first {r}")))
        .on_match(1, |c: &mut Calls, r: &str| c.record(format!("second {r}")))
        .on_match(3, |c: &mut Calls, r: &str| c.record(format!("third {r}")));
}

#[tokio::test]
async fn test_menu_without_matches_is_rejected() {
    let session = ScriptedSession::new();
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let err = controller
        .menu(&prompts(), &MenuOptions::default(), &mut calls, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AsrError::Configuration(_)));
    assert!(err.to_string().contains("specify one or more matches"));
    assert!(session.operations().is_empty());
}

#[tokio::test]
async fn test_menu_dispatches_on_tag_index() {
    let session = ScriptedSession::new();
    session.push_event(tagged_match("1", "1"));
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let outcome = controller
        .menu(&prompts(), &MenuOptions::default(), &mut calls, three_options)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        MenuOutcome::Matched {
            index: 1,
            response: "1".into()
        }
    );
    assert_eq!(calls.0, vec!["second 1"]);
}

#[tokio::test]
async fn test_menu_submits_tagged_grammar() {
    let session = ScriptedSession::new();
    session.push_caller("3");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        timeout: Some(10),
        interruptible: Some(false),
        ..MenuOptions::default()
    };
    controller
        .menu(&prompts(), &options, &mut calls, three_options)
        .await
        .unwrap();
    assert_eq!(calls.0, vec!["third 3"]);

    let operations = session.operations();
    let Operation::Prompt { input, barge_in, .. } = &operations[0] else {
        panic!("expected a prompt component");
    };
    assert!(!barge_in);
    assert_eq!(input.mode, InputMode::Dtmf);
    assert_eq!(input.initial_timeout, Some(Timeout::from_seconds(10)));
    let keys = [Keys::from(2), Keys::from(1), Keys::from(3)];
    let expected = tagged_menu_grammar(&keys, InputMode::Dtmf).unwrap();
    assert_eq!(input.grammars.iter().next(), Some(&GrammarRef::Value(expected)));
}

#[tokio::test]
async fn test_menu_retries_until_match() {
    let session = ScriptedSession::new();
    session
        .push_event(CompletionEvent::NoMatch)
        .push_caller("9")
        .push_caller("1");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        tries: 3,
        ..MenuOptions::default()
    };
    let outcome = controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            three_options(menu);
            menu.invalid(|c: &mut Calls, r: Option<&str>| c.record(format!("invalid {r:?}")))
                .failure(|c: &mut Calls| c.record("failure"));
        })
        .await
        .unwrap();

    assert!(matches!(outcome, MenuOutcome::Matched { index: 1, .. }));
    assert_eq!(calls.0, vec!["invalid None", "invalid None", "second 1"]);

    let operations = session.operations();
    assert_eq!(operations.len(), 3);
    assert!(operations.windows(2).all(|pair| pair[0].input() == pair[1].input()));
}

#[tokio::test]
async fn test_menu_exhaustion_runs_failure_last() {
    let session = ScriptedSession::new();
    session
        .push_event(CompletionEvent::NoInput)
        .push_event(CompletionEvent::NoMatch);
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        tries: 2,
        ..MenuOptions::default()
    };
    let outcome = controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            menu.on_match(1, |c: &mut Calls, _: &str| c.record("matched"))
                .invalid(|c: &mut Calls, _: Option<&str>| c.record("invalid"))
                .timeout(|c: &mut Calls| c.record("timeout"))
                .failure(|c: &mut Calls| c.record("failure"));
        })
        .await
        .unwrap();

    assert_eq!(outcome, MenuOutcome::Exhausted);
    assert_eq!(calls.0, vec!["timeout", "invalid", "failure"]);
}

#[tokio::test]
async fn test_menu_single_try_by_default() {
    let session = ScriptedSession::new();
    session
        .push_event(CompletionEvent::NoMatch)
        .push_caller("1");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let outcome = controller
        .menu(&prompts(), &MenuOptions::default(), &mut calls, |menu| {
            menu.on_match(1, |c: &mut Calls, _: &str| c.record("matched"))
                .invalid(|c: &mut Calls, _: Option<&str>| c.record("invalid"))
                .failure(|c: &mut Calls| c.record("failure"));
        })
        .await
        .unwrap();

    assert_eq!(outcome, MenuOutcome::Exhausted);
    assert_eq!(calls.0, vec!["invalid", "failure"]);
    assert_eq!(session.remaining(), 1);
}

#[tokio::test]
async fn test_menu_error_is_not_retried() {
    let session = ScriptedSession::new();
    session
        .push_event(CompletionEvent::error("foobar"))
        .push_caller("1");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        tries: 3,
        ..MenuOptions::default()
    };
    let err = controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            menu.on_match(1, |c: &mut Calls, _: &str| c.record("matched"))
                .failure(|c: &mut Calls| c.record("failure"));
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AsrError::Interaction(_)));
    assert!(err.to_string().contains("foobar"));
    assert!(calls.0.is_empty());
    assert_eq!(session.operations().len(), 1);
}

#[tokio::test]
async fn test_menu_hangup_ends_without_callbacks() {
    let session = ScriptedSession::new();
    session.push_event(CompletionEvent::Hangup);
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        tries: 3,
        ..MenuOptions::default()
    };
    let outcome = controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            menu.on_match(1, |c: &mut Calls, _: &str| c.record("matched"))
                .invalid(|c: &mut Calls, _: Option<&str>| c.record("invalid"))
                .timeout(|c: &mut Calls| c.record("timeout"))
                .failure(|c: &mut Calls| c.record("failure"));
        })
        .await
        .unwrap();

    assert_eq!(outcome, MenuOutcome::Hangup);
    assert!(calls.0.is_empty());
    assert_eq!(session.operations().len(), 1);
}

#[tokio::test]
async fn test_menu_on_dead_call() {
    let session = ScriptedSession::new();
    session.hangup();
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let err = controller
        .menu(&prompts(), &MenuOptions::default(), &mut calls, |menu| {
            menu.on_match(1, |c: &mut Calls, _: &str| c.record("matched"));
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AsrError::SessionGone));
}

#[tokio::test]
async fn test_menu_invokes_target_with_extension() {
    let session = ScriptedSession::new();
    session.push_event(CompletionEvent::NoMatch).push_caller("3");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        tries: 3,
        ..MenuOptions::default()
    };
    controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            menu.on_match(2, |c: &mut Calls, _: &str| c.record("two"))
                .on_match(1, |c: &mut Calls, _: &str| c.record("one"))
                .on_match_invoke(3, "support")
                .invalid(|c: &mut Calls, _: Option<&str>| c.record("invalid"));
        })
        .await
        .unwrap();

    assert_eq!(calls.0, vec!["invalid", "invoke support extension=3"]);
}

#[tokio::test]
async fn test_menu_overlapping_keys_prefer_first_option() {
    let session = ScriptedSession::new();
    session.push_caller("2");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let outcome = controller
        .menu(&prompts(), &MenuOptions::default(), &mut calls, |menu| {
            menu.on_match(1..=3, |c: &mut Calls, r: &str| c.record(format!("range {r}")))
                .on_match(2, |c: &mut Calls, r: &str| c.record(format!("exact {r}")));
        })
        .await
        .unwrap();

    assert!(matches!(outcome, MenuOutcome::Matched { index: 0, .. }));
    assert_eq!(calls.0, vec!["range 2"]);
}

#[tokio::test]
async fn test_menu_in_speech_mode() {
    let session = ScriptedSession::new();
    session.push_caller("hello world");
    let controller = AsrController::new(&session, AsrConfig::default());
    let mut calls = Calls::default();

    let options = MenuOptions {
        mode: InputMode::Speech,
        ..MenuOptions::default()
    };
    let outcome = controller
        .menu(&prompts(), &options, &mut calls, |menu| {
            menu.on_match("Hello world", |c: &mut Calls, r: &str| c.record(format!("greeted {r}")));
        })
        .await
        .unwrap();

    assert!(matches!(outcome, MenuOutcome::Matched { index: 0, .. }));
    assert_eq!(calls.0, vec!["greeted hello world"]);

    let operation = &session.operations()[0];
    let input = operation.input().unwrap();
    assert_eq!(input.mode, InputMode::Speech);
    let Some(GrammarRef::Value(grammar)) = input.grammars.iter().next() else {
        panic!("expected an inline grammar");
    };
    assert_eq!(grammar.mode, InputMode::Speech);
    assert!(grammar.to_string().contains("mode=\"voice\""));
}

#[tokio::test]
async fn test_menu_runs_on_spawned_task() {
    let session = Arc::new(ScriptedSession::new());
    session.push_event(CompletionEvent::NoMatch).push_caller("3");

    let call = Arc::clone(&session);
    let task = tokio::spawn(async move {
        let controller = AsrController::new(&*call, AsrConfig::default());
        let mut calls = Calls::default();
        let options = MenuOptions {
            tries: 2,
            ..MenuOptions::default()
        };
        let outcome = controller
            .menu(&prompts(), &options, &mut calls, |menu| {
                three_options(menu);
                menu.invalid(|c: &mut Calls, _: Option<&str>| c.record("invalid"));
            })
            .await;
        (outcome, calls)
    });

    let (outcome, calls) = task.await.unwrap();
    assert!(matches!(outcome.unwrap(), MenuOutcome::Matched { index: 2, .. }));
    assert_eq!(calls.0, vec!["invalid", "third 3"]);
    assert_eq!(session.operations().len(), 2);
}
