use lenz_core::{InputMode, Msg, SummaryFormat, SummaryLength};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    Unknown(String),
    #[error("{command}: missing argument ({expected})")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("{command}: '{value}' is not one of {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Parses one input line. Blank lines parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };
    let arg = rest.trim();

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "mode" => Msg::ModeSelected(parse_mode(arg)?),
        "text" => Msg::TextChanged(unescape(rest.trim_end_matches(['\r', '\n']))),
        "file" => Msg::SelectFileClicked,
        "url" => Msg::UrlChanged(arg.to_string()),
        "fetch" => Msg::FetchClicked,
        "filter" => Msg::AiFilterToggled(parse_switch(arg)?),
        "edit" => Msg::EditClicked,
        "buffer" => Msg::EditBufferChanged(unescape(rest.trim_end_matches(['\r', '\n']))),
        "save-edit" => Msg::SaveEditClicked,
        "cancel-edit" => Msg::CancelEditClicked,
        "length" => Msg::LengthChanged(
            SummaryLength::parse(require(arg, "length", "short|medium|long")?).ok_or_else(|| {
                CommandError::InvalidArgument {
                    command: "length",
                    value: arg.to_string(),
                    expected: "short|medium|long",
                }
            })?,
        ),
        "format" => Msg::FormatChanged(
            SummaryFormat::parse(require(arg, "format", "paragraph|bullet|structured")?)
                .ok_or_else(|| CommandError::InvalidArgument {
                    command: "format",
                    value: arg.to_string(),
                    expected: "paragraph|bullet|structured",
                })?,
        ),
        "lang" => Msg::OutputLanguageChanged(require(arg, "lang", "auto or a language code")?.to_string()),
        "summarize" => Msg::SummarizeClicked,
        "keywords" => Msg::ExtractKeywordsClicked,
        "detect" => Msg::DetectLanguageClicked,
        "export" | "save" => Msg::SaveResultClicked,
        "ui-lang" => Msg::UiLanguageChanged(require(arg, "ui-lang", "ko|en")?.to_string()),
        "endpoint" => match require(arg, "endpoint", "a URL or 'default'")? {
            "default" => Msg::ApiEndpointSaved(None),
            url => Msg::ApiEndpointSaved(Some(url.to_string())),
        },
        "status" => Msg::ApiStatusRequested,
        "dismiss" => Msg::NoticeDismissed,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(Command::Dispatch(msg)))
}

fn require<'a>(
    arg: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(arg)
    }
}

fn parse_mode(arg: &str) -> Result<InputMode, CommandError> {
    match require(arg, "mode", "text|file|url")?.to_ascii_lowercase().as_str() {
        "text" => Ok(InputMode::Text),
        "file" => Ok(InputMode::File),
        "url" => Ok(InputMode::Url),
        _ => Err(CommandError::InvalidArgument {
            command: "mode",
            value: arg.to_string(),
            expected: "text|file|url",
        }),
    }
}

fn parse_switch(arg: &str) -> Result<bool, CommandError> {
    match require(arg, "filter", "on|off")?.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::InvalidArgument {
            command: "filter",
            value: arg.to_string(),
            expected: "on|off",
        }),
    }
}

/// Single-line input can carry line breaks as `\n`.
fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
