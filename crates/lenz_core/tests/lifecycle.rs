use std::path::PathBuf;
use std::sync::Once;

use lenz_core::{
    update, AppState, Effect, InputMode, Lifecycle, Msg, Notice, OperationKind, OutputLanguage,
    ResultRecord, SummaryFormat, SummaryLength, SummaryOptions, SummaryOutcome, SummarySource,
    ValidationError,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn summarize_text(state: AppState, text: &str) -> (AppState, u64) {
    let (state, _) = update(state, Msg::TextChanged(text.to_string()));
    let (state, effects) = update(state, Msg::SummarizeClicked);
    match effects.as_slice() {
        [Effect::Summarize { request_id, .. }] => (state, *request_id),
        other => panic!("expected one summarize effect, got {other:?}"),
    }
}

fn outcome(summary: &str) -> SummaryOutcome {
    SummaryOutcome {
        summary: summary.to_string(),
        detected_language: Some("en".to_string()),
        detected_language_name: Some("English".to_string()),
    }
}

fn complete_summary(state: AppState, request_id: u64, summary: &str) -> (AppState, u64) {
    let (state, effects) = update(
        state,
        Msg::SummaryCompleted {
            request_id,
            result: Ok(outcome(summary)),
        },
    );
    match effects.as_slice() {
        [Effect::ExtractKeywords { request_id, .. }] => (state, *request_id),
        other => panic!("expected one keyword effect, got {other:?}"),
    }
}

#[test]
fn text_summary_end_to_end() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::LengthChanged(SummaryLength::Short));
    let (state, _) = update(state, Msg::FormatChanged(SummaryFormat::Paragraph));
    let (state, _) = update(state, Msg::OutputLanguageChanged("auto".to_string()));
    let (state, _) = update(state, Msg::TextChanged("hello world".to_string()));
    let (state, effects) = update(state, Msg::SummarizeClicked);

    assert_eq!(
        effects,
        vec![Effect::Summarize {
            request_id: 1,
            source: SummarySource::Text("hello world".to_string()),
            options: SummaryOptions {
                length: SummaryLength::Short,
                format: SummaryFormat::Paragraph,
                language: OutputLanguage::auto(),
            },
        }]
    );
    let view = state.view();
    assert_eq!(view.summarize, Lifecycle::Loading);
    assert!(!view.controls.summarize);

    let (state, effects) = update(
        state,
        Msg::SummaryCompleted {
            request_id: 1,
            result: Ok(SummaryOutcome {
                summary: "hi".to_string(),
                detected_language: Some("en".to_string()),
                detected_language_name: Some("English".to_string()),
            }),
        },
    );
    let view = state.view();
    assert_eq!(view.summarize, Lifecycle::Succeeded);
    assert!(view.controls.summarize);
    assert_eq!(
        view.result,
        ResultRecord {
            summary_text: Some("hi".to_string()),
            detected_language_code: Some("en".to_string()),
            detected_language_name: Some("English".to_string()),
            keywords: Vec::new(),
        }
    );
    // Follow-up keyword pass on the submitted text.
    assert_eq!(
        effects,
        vec![Effect::ExtractKeywords {
            request_id: 2,
            text: "hello world".to_string(),
            count: 10,
            language: OutputLanguage::auto(),
        }]
    );
}

#[test]
fn summarize_while_loading_is_noop() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "some text");
    let before = state.view();

    let (state, effects) = update(state, Msg::SummarizeClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert_eq!(
        state.presentation().lifecycle(OperationKind::Summarize),
        Lifecycle::Loading
    );

    let (state, _) = complete_summary(state, first, "done");
    assert_eq!(state.view().summarize, Lifecycle::Succeeded);
}

#[test]
fn failure_surfaces_notice_and_reenables_controls() {
    init_logging();
    let (state, request_id) = summarize_text(AppState::new(), "some text");
    let (state, effects) = update(
        state,
        Msg::SummaryCompleted {
            request_id,
            result: Err("connection refused".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.summarize, Lifecycle::Failed);
    assert!(view.controls.summarize);
    assert_eq!(view.result, ResultRecord::default());
    assert_eq!(
        view.notice,
        Some(Notice::OperationFailed {
            kind: OperationKind::Summarize,
            message: "connection refused".to_string(),
        })
    );
}

#[test]
fn new_submission_clears_previous_results() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "first text");
    let (state, keywords) = complete_summary(state, first, "first summary");
    let (state, _) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: keywords,
            result: Ok(vec!["first".to_string()]),
        },
    );
    assert_eq!(state.view().result.keywords, vec!["first".to_string()]);

    let (state, _second) = summarize_text(state, "second text");
    assert_eq!(state.view().result, ResultRecord::default());
}

#[test]
fn stale_keyword_response_never_overwrites_latest() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "first text");
    let (state, stale_keywords) = complete_summary(state, first, "first summary");

    // User starts a new summary before the first keyword pass resolves.
    let (state, second) = summarize_text(state, "second text");
    let (state, fresh_keywords) = complete_summary(state, second, "second summary");
    assert_ne!(stale_keywords, fresh_keywords);

    // Responses arrive out of order: fresh first, stale last.
    let (state, _) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: fresh_keywords,
            result: Ok(vec!["second".to_string(), "fresh".to_string()]),
        },
    );
    let (state, effects) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: stale_keywords,
            result: Ok(vec!["first".to_string(), "stale".to_string()]),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(
        view.result.keywords,
        vec!["second".to_string(), "fresh".to_string()]
    );
    assert_eq!(view.result.summary_text.as_deref(), Some("second summary"));
}

#[test]
fn manual_extraction_supersedes_pending_auto_pass() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "alpha beta");
    let (state, auto_keywords) = complete_summary(state, first, "summary");

    let (state, effects) = update(state, Msg::ExtractKeywordsClicked);
    let manual = match effects.as_slice() {
        [Effect::ExtractKeywords { request_id, .. }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };
    assert_eq!(state.view().keywords, Lifecycle::Loading);

    let (state, _) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: manual,
            result: Ok(vec!["manual".to_string()]),
        },
    );
    let (state, _) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: auto_keywords,
            result: Ok(vec!["auto".to_string()]),
        },
    );
    let view = state.view();
    assert_eq!(view.keywords, Lifecycle::Succeeded);
    assert_eq!(view.result.keywords, vec!["manual".to_string()]);
}

#[test]
fn secondary_keyword_failure_is_silent() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "some text");
    let (state, keywords) = complete_summary(state, first, "kept summary");
    let (state, effects) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: keywords,
            result: Err("keyword service down".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.notice, None);
    assert_eq!(view.summarize, Lifecycle::Succeeded);
    assert_eq!(view.keywords, Lifecycle::Idle);
    assert_eq!(view.result.summary_text.as_deref(), Some("kept summary"));
}

#[test]
fn manual_keyword_failure_is_surfaced() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::TextChanged("alpha".to_string()));
    let (state, effects) = update(state, Msg::ExtractKeywordsClicked);
    assert_eq!(effects.len(), 1);
    let (state, _) = update(
        state,
        Msg::KeywordsCompleted {
            request_id: 1,
            result: Err("bad request".to_string()),
        },
    );
    let view = state.view();
    assert_eq!(view.keywords, Lifecycle::Failed);
    assert_eq!(
        view.notice,
        Some(Notice::OperationFailed {
            kind: OperationKind::Keywords,
            message: "bad request".to_string(),
        })
    );
}

#[test]
fn file_summary_extracts_keywords_from_summary_text() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(InputMode::File));
    let (state, _) = update(
        state,
        Msg::FileSelected(Ok(Some(PathBuf::from("notes.pdf")))),
    );
    let (state, effects) = update(state, Msg::SummarizeClicked);
    assert_eq!(effects.len(), 1);
    let (_state, effects) = update(
        state,
        Msg::SummaryCompleted {
            request_id: 1,
            result: Ok(outcome("pdf summary")),
        },
    );
    match effects.as_slice() {
        [Effect::ExtractKeywords { text, .. }] => assert_eq!(text, "pdf summary"),
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn language_detection_keeps_summary() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "bonjour le monde");
    let (state, _) = complete_summary(state, first, "salut");
    let (state, effects) = update(state, Msg::DetectLanguageClicked);
    let request_id = match effects.as_slice() {
        [Effect::DetectLanguage { request_id, text }] => {
            assert_eq!(text, "bonjour le monde");
            *request_id
        }
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::LanguageDetected {
            request_id,
            result: Ok("fr".to_string()),
        },
    );
    let view = state.view();
    assert_eq!(view.detect, Lifecycle::Succeeded);
    assert_eq!(view.result.detected_language_code.as_deref(), Some("fr"));
    assert_eq!(view.result.summary_text.as_deref(), Some("salut"));
}

#[test]
fn export_requires_a_summary() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SaveResultClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().notice,
        Some(Notice::Validation(ValidationError::NoSummary))
    );
}

#[test]
fn export_round_trip() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "text");
    let (state, _) = complete_summary(state, first, "the summary");
    let (state, effects) = update(state, Msg::SaveResultClicked);
    let request_id = match effects.as_slice() {
        [Effect::SaveSummary {
            request_id,
            summary,
            suggested_name,
        }] => {
            assert_eq!(summary, "the summary");
            assert_eq!(suggested_name, "summary.txt");
            *request_id
        }
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(!state.view().controls.export);

    let (state, _) = update(
        state,
        Msg::SaveCompleted {
            request_id,
            result: Ok(Some(PathBuf::from("/tmp/summary.txt"))),
        },
    );
    let view = state.view();
    assert_eq!(view.export, Lifecycle::Succeeded);
    assert_eq!(
        view.notice,
        Some(Notice::ExportSaved {
            path: PathBuf::from("/tmp/summary.txt")
        })
    );
}

#[test]
fn canceled_export_returns_to_idle() {
    init_logging();
    let (state, first) = summarize_text(AppState::new(), "text");
    let (state, _) = complete_summary(state, first, "the summary");
    let (state, _) = update(state, Msg::SaveResultClicked);
    let (state, _) = update(
        state,
        Msg::SaveCompleted {
            request_id: 3,
            result: Ok(None),
        },
    );
    let view = state.view();
    assert_eq!(view.export, Lifecycle::Idle);
    assert_eq!(view.notice, None);
}
