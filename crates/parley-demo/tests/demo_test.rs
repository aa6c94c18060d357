use parley_asr::testing::{Scripted, ScriptedSession};
use parley_asr::{AsrError, MenuOutcome, Operation};
use parley_demo::config::{load_config, Config};
use parley_demo::demo;
use parley_types::{CompletionEvent, CompletionStatus};
use std::io::Write;

#[tokio::test]
async fn test_default_script_walks_every_step() {
    let report = demo::run(&Config::default()).await.unwrap();

    assert_eq!(report.account.status(), CompletionStatus::Match);
    assert_eq!(report.account.response(), Some("1234"));
    assert_eq!(report.department.response(), Some("support"));
    assert_eq!(
        report.menu,
        MenuOutcome::Matched {
            index: 1,
            response: "2".into()
        }
    );
    assert_eq!(report.desk, vec!["invalid -", "balance"]);
}

#[tokio::test]
async fn test_listen_runs_output_and_input_separately() {
    let session = ScriptedSession::with_script(Config::default().script);
    demo::run_on(&session, &Config::default()).await.unwrap();

    let operations = session.operations();
    assert!(matches!(operations[0], Operation::Prompt { .. }));
    assert!(matches!(operations[1], Operation::Output(_)));
    assert!(matches!(operations[2], Operation::Input(_)));
    assert_eq!(session.remaining(), 0);
}

#[tokio::test]
async fn test_menu_transfer_to_billing() {
    let config = Config {
        script: vec![
            Scripted::Caller("42#".into()),
            Scripted::Caller("billing".into()),
            Scripted::Caller("3".into()),
        ],
        ..Config::default()
    };
    let report = demo::run(&config).await.unwrap();
    assert_eq!(report.account.response(), Some("42"));
    assert_eq!(report.desk, vec!["invoke billing extension=3"]);
}

#[tokio::test]
async fn test_unanswered_menu_exhausts() {
    let config = Config {
        script: vec![
            Scripted::Caller("7#".into()),
            Scripted::Event(CompletionEvent::NoMatch),
            Scripted::Event(CompletionEvent::NoInput),
            Scripted::Caller("9".into()),
            Scripted::Event(CompletionEvent::NoInput),
        ],
        ..Config::default()
    };
    let report = demo::run(&config).await.unwrap();
    assert_eq!(report.department.status(), CompletionStatus::NoMatch);
    assert_eq!(report.menu, MenuOutcome::Exhausted);
    assert_eq!(report.desk, vec!["timeout", "invalid -", "timeout", "failure"]);
}

#[tokio::test]
async fn test_short_script_ends_the_call() {
    let config = Config {
        script: vec![Scripted::Caller("1#".into())],
        ..Config::default()
    };
    let err = demo::run(&config).await.unwrap_err();
    assert!(matches!(err, AsrError::SessionGone));
}

#[tokio::test]
async fn test_script_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        script = [
            {{ caller = "555#" }},
            {{ caller = "sales" }},
            {{ caller = "1" }},
        ]
        "#
    )
    .unwrap();

    let config = load_config(file.path().to_str()).unwrap();
    let report = demo::run(&config).await.unwrap();
    assert_eq!(report.account.response(), Some("555"));
    assert_eq!(report.department.response(), Some("sales"));
    assert_eq!(report.desk, vec!["opening hours"]);
}
