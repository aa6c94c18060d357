//! Completion event to [`InteractionResult`] conversion.

use crate::error::AsrError;
use parley_types::{CompletionEvent, InputMode, InteractionResult};

/// Which error class a transport failure is reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFlavor {
    /// `ask` and `menu`.
    Interaction,
    /// `listen`.
    Listen,
}

/// Interprets the terminal event of an input or prompt component.
///
/// Error events become [`AsrError::Interaction`] or [`AsrError::Listen`]
/// depending on `flavor`. An event outside the input taxonomy is a defect
/// and yields [`AsrError::UnknownCompletion`].
pub fn interpret(event: CompletionEvent, flavor: ErrorFlavor) -> Result<InteractionResult, AsrError> {
    match event {
        CompletionEvent::Match(reason) => {
            let mode = reason.mode();
            let utterance = match mode {
                Some(InputMode::Dtmf) => normalize_dtmf(reason.utterance()),
                _ => reason.utterance().map(str::to_string),
            };
            let confidence = reason.confidence();
            let interpretation = reason.interpretation().cloned();
            Ok(InteractionResult::matched(
                mode,
                confidence,
                utterance,
                interpretation,
                reason.nlsml,
            ))
        }
        CompletionEvent::NoMatch => Ok(InteractionResult::no_match()),
        CompletionEvent::NoInput => Ok(InteractionResult::no_input()),
        CompletionEvent::Hangup => Ok(InteractionResult::hangup()),
        CompletionEvent::Stop => Ok(InteractionResult::stop()),
        CompletionEvent::Error { details } => Err(match flavor {
            ErrorFlavor::Interaction => AsrError::Interaction(details),
            ErrorFlavor::Listen => AsrError::Listen(details),
        }),
        other @ (CompletionEvent::Finish | CompletionEvent::Unrecognized { .. }) => {
            Err(AsrError::UnknownCompletion(other.name().to_string()))
        }
    }
}

/// Folds a DTMF token sequence into a digit string.
///
/// Tokens are whitespace separated and either bare keys or `dtmf-` tone
/// names: `"1 dtmf-5 dtmf-star # 2"` becomes `"15*#2"`. Missing or empty
/// input yields `None`.
pub fn normalize_dtmf(input: Option<&str>) -> Option<String> {
    let digits: String = input?.split_whitespace().map(tone).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

fn tone(token: &str) -> &str {
    match token.strip_prefix("dtmf-") {
        Some("star") => "*",
        Some("pound") => "#",
        Some(key) => key,
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::{CompletionStatus, Interpretation, MatchReason, Nlsml};
    use serde_json::Value;

    fn match_event(utterance: &str, mode: InputMode, instance: &str) -> CompletionEvent {
        CompletionEvent::Match(MatchReason::new(Nlsml::new().with_interpretation(
            Interpretation::new(1.0)
                .with_input(utterance, mode)
                .with_instance(instance),
        )))
    }

    #[test]
    fn normalizes_mixed_tokens() {
        assert_eq!(
            normalize_dtmf(Some("1 dtmf-5 dtmf-star # 2")).as_deref(),
            Some("15*#2")
        );
        assert_eq!(normalize_dtmf(Some("dtmf-pound dtmf-0")).as_deref(), Some("#0"));
        assert_eq!(normalize_dtmf(None), None);
        assert_eq!(normalize_dtmf(Some("")), None);
        assert_eq!(normalize_dtmf(Some("   ")), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["15*#2", "1 dtmf-5 dtmf-star # 2", "dtmf-9"] {
            let once = normalize_dtmf(Some(input));
            assert_eq!(normalize_dtmf(once.as_deref()), once);
        }
    }

    #[test]
    fn match_copies_fields() {
        let result = interpret(match_event("123", InputMode::Dtmf, "Foo"), ErrorFlavor::Interaction)
            .unwrap();
        assert_eq!(result.status(), CompletionStatus::Match);
        assert_eq!(result.confidence(), Some(1.0));
        assert_eq!(result.response(), Some("123"));
        assert_eq!(result.interpretation(), Some(&Value::from("Foo")));
        assert_eq!(result.mode(), Some(InputMode::Dtmf));
        assert!(result.nlsml().is_some());
    }

    #[test]
    fn dtmf_match_is_normalized() {
        let result = interpret(
            match_event("dtmf-1 dtmf-2 dtmf-pound", InputMode::Dtmf, "0"),
            ErrorFlavor::Interaction,
        )
        .unwrap();
        assert_eq!(result.response(), Some("12#"));
    }

    #[test]
    fn speech_match_is_left_alone() {
        let result = interpret(
            match_event("dtmf-star please", InputMode::Speech, "0"),
            ErrorFlavor::Listen,
        )
        .unwrap();
        assert_eq!(result.response(), Some("dtmf-star please"));
    }

    #[test]
    fn plain_reasons_map_to_status() {
        let cases = [
            (CompletionEvent::NoMatch, CompletionStatus::NoMatch),
            (CompletionEvent::NoInput, CompletionStatus::NoInput),
            (CompletionEvent::Hangup, CompletionStatus::Hangup),
            (CompletionEvent::Stop, CompletionStatus::Stop),
        ];
        for (event, status) in cases {
            let result = interpret(event, ErrorFlavor::Interaction).unwrap();
            assert_eq!(result.status(), status);
            assert_eq!(result.confidence(), None);
            assert_eq!(result.response(), None);
            assert_eq!(result.interpretation(), None);
            assert!(result.nlsml().is_none());
        }
    }

    #[test]
    fn error_flavors() {
        let err = interpret(CompletionEvent::error("foobar"), ErrorFlavor::Interaction).unwrap_err();
        assert!(matches!(err, AsrError::Interaction(_)));
        assert!(err.to_string().contains("foobar"));

        let err = interpret(CompletionEvent::error("foobar"), ErrorFlavor::Listen).unwrap_err();
        assert!(matches!(err, AsrError::Listen(_)));
        assert!(err.is_interaction());
        assert!(err.to_string().contains("foobar"));
    }

    #[test]
    fn unknown_reasons_are_fatal() {
        let err = interpret(
            CompletionEvent::Unrecognized {
                name: "teleported".into(),
            },
            ErrorFlavor::Interaction,
        )
        .unwrap_err();
        assert!(matches!(err, AsrError::UnknownCompletion(ref name) if name == "teleported"));

        let err = interpret(CompletionEvent::Finish, ErrorFlavor::Listen).unwrap_err();
        assert!(matches!(err, AsrError::UnknownCompletion(_)));
    }
}
