use std::fmt::Write;

use lenz_core::{AppViewModel, ApiStatus, InputMode, Lifecycle, UrlFetchState};

use super::catalog::{notice_text, texts, Texts};

const TEXT_SNIPPET_CHARS: usize = 80;

/// Renders the whole view model as a block of terminal text.
pub fn render(view: &AppViewModel) -> String {
    let t = texts(view.ui_language);
    let mut out = String::new();

    let mode = match view.mode {
        InputMode::Text => t.mode_text,
        InputMode::File => t.mode_file,
        InputMode::Url => t.mode_url,
    };
    let status = match view.api_status {
        ApiStatus::Unknown => t.api_unknown,
        ApiStatus::Checking => t.api_checking,
        ApiStatus::Connected => t.api_connected,
        ApiStatus::Unreachable => t.api_unreachable,
    };
    let endpoint = view.endpoint.as_deref().unwrap_or(t.default_endpoint);
    let _ = writeln!(out, "== {} ==", t.title);
    let _ = writeln!(
        out,
        "{}: {} | {}: {} ({}) | {}: {}",
        t.mode,
        mode,
        t.api,
        status,
        endpoint,
        t.ui_language,
        view.ui_language.code()
    );

    match view.mode {
        InputMode::Text => {
            let text = if view.text.is_empty() {
                t.empty.to_string()
            } else {
                snippet(&view.text, TEXT_SNIPPET_CHARS)
            };
            let _ = writeln!(out, "{}: {}", t.text, text);
        }
        InputMode::File => {
            let name = view.selected_file.as_deref().unwrap_or(t.no_file);
            let _ = writeln!(out, "{}: {}", t.file, name);
        }
        InputMode::Url => render_url(&mut out, t, view),
    }

    let _ = writeln!(
        out,
        "{}: {} {}, {} {}, {} {}",
        t.options,
        t.length,
        view.options.length.as_str(),
        t.format,
        view.options.format.as_str(),
        t.output_language,
        view.options.language.as_str()
    );

    render_summary(&mut out, t, view);

    if let Some(notice) = &view.notice {
        let _ = writeln!(
            out,
            "[{}] {}",
            t.notice,
            notice_text(view.ui_language, notice)
        );
    }
    out
}

fn render_url(out: &mut String, t: &Texts, view: &AppViewModel) {
    let url = &view.url;
    let fetch = match url.fetch {
        UrlFetchState::NotFetched => t.not_fetched,
        UrlFetchState::Fetching => t.fetching,
        UrlFetchState::Fetched => t.fetched,
        UrlFetchState::Editing => t.editing,
    };
    let address = if url.address.is_empty() {
        t.empty
    } else {
        url.address.as_str()
    };
    let filter = if url.use_ai_filter { t.on } else { t.off };
    let _ = writeln!(
        out,
        "{}: {} [{}] ({} {})",
        t.url, address, fetch, t.ai_filter, filter
    );
    if let Some(title) = &url.title {
        let _ = writeln!(out, "  {}: {}", t.page_title, title);
    }
    if let Some(source) = &url.source_url {
        let _ = writeln!(out, "  {}: {}", t.source, source);
    }
    if let Some(preview) = &url.preview {
        let _ = writeln!(out, "  {}:\n{}", t.preview, indent(preview));
    }
    if let Some(buffer) = &url.edit_buffer {
        let _ = writeln!(out, "  {}:\n{}", t.edit_buffer, indent(buffer));
    }
}

fn render_summary(out: &mut String, t: &Texts, view: &AppViewModel) {
    let result = &view.result;
    match (view.summarize, &result.summary_text) {
        (Lifecycle::Loading, _) => {
            let _ = writeln!(out, "{}: {}", t.summary, t.loading);
        }
        (_, Some(summary)) => {
            let _ = writeln!(out, "{}:\n{}", t.summary, indent(summary));
        }
        (Lifecycle::Failed, None) => {
            let _ = writeln!(out, "{}: {}", t.summary, t.failed);
        }
        _ => {}
    }

    if view.detect == Lifecycle::Loading {
        let _ = writeln!(out, "{}: {}", t.detected_language, t.loading);
    } else if let Some(code) = &result.detected_language_code {
        match &result.detected_language_name {
            Some(name) => {
                let _ = writeln!(out, "{}: {} ({})", t.detected_language, name, code);
            }
            None => {
                let _ = writeln!(out, "{}: {}", t.detected_language, code);
            }
        }
    }

    if view.keywords == Lifecycle::Loading {
        let _ = writeln!(out, "{}: {}", t.keywords, t.loading);
    } else if !result.keywords.is_empty() {
        let _ = writeln!(out, "{}: {}", t.keywords, result.keywords.join(", "));
    }

    if view.export == Lifecycle::Loading {
        let _ = writeln!(out, "{}: {}", t.export, t.loading);
    }
}

fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        None => flat,
        Some((end, _)) => format!("{}...", &flat[..end]),
    }
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenz_core::{Notice, ResultRecord, UiLanguage, UrlView, ValidationError};

    fn base_view() -> AppViewModel {
        AppViewModel {
            ui_language: UiLanguage::En,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn header_shows_mode_status_and_endpoint() {
        let view = AppViewModel {
            api_status: ApiStatus::Connected,
            endpoint: Some("http://localhost:8000".to_string()),
            ..base_view()
        };
        let text = render(&view);
        assert!(text.contains("Input mode: Text | API: connected (http://localhost:8000) | Language: en"));
        assert!(text.contains("Text: (empty)"));
        assert!(text.contains("Options: length medium, format paragraph, language auto"));
    }

    #[test]
    fn korean_is_the_default_wording() {
        let text = render(&AppViewModel::default());
        assert!(text.contains("콘텐츠 렌즈"));
        assert!(text.contains("기본 서버"));
    }

    #[test]
    fn summary_language_and_keywords_are_listed() {
        let view = AppViewModel {
            summarize: Lifecycle::Succeeded,
            keywords: Lifecycle::Succeeded,
            result: ResultRecord {
                summary_text: Some("Line one\nLine two".to_string()),
                detected_language_code: Some("en".to_string()),
                detected_language_name: Some("English".to_string()),
                keywords: vec!["hello".to_string(), "world".to_string()],
            },
            ..base_view()
        };
        let text = render(&view);
        assert!(text.contains("Summary:\n    Line one\n    Line two"));
        assert!(text.contains("Detected language: English (en)"));
        assert!(text.contains("Keywords: hello, world"));
    }

    #[test]
    fn loading_replaces_panel_content() {
        let view = AppViewModel {
            summarize: Lifecycle::Loading,
            keywords: Lifecycle::Loading,
            ..base_view()
        };
        let text = render(&view);
        assert!(text.contains("Summary: working..."));
        assert!(text.contains("Keywords: working..."));
    }

    #[test]
    fn url_mode_shows_fetch_state_and_edit_buffer() {
        let view = AppViewModel {
            mode: InputMode::Url,
            url: UrlView {
                address: "example.com".to_string(),
                fetch: UrlFetchState::Editing,
                use_ai_filter: false,
                title: Some("Example Domain".to_string()),
                source_url: Some("https://example.com".to_string()),
                preview: Some("original".to_string()),
                edit_buffer: Some("changed".to_string()),
            },
            ..base_view()
        };
        let text = render(&view);
        assert!(text.contains("URL: example.com [editing] (AI filter off)"));
        assert!(text.contains("Title: Example Domain"));
        assert!(text.contains("Edit buffer:\n    changed"));
    }

    #[test]
    fn notice_is_localized() {
        let view = AppViewModel {
            notice: Some(Notice::Validation(ValidationError::EmptyText)),
            ..base_view()
        };
        assert!(render(&view).contains("[Notice] Enter some text first."));
    }

    #[test]
    fn long_text_is_cut_in_header() {
        let view = AppViewModel {
            text: "x".repeat(200),
            ..base_view()
        };
        let text = render(&view);
        assert!(text.contains(&format!("Text: {}...", "x".repeat(TEXT_SNIPPET_CHARS))));
    }
}
