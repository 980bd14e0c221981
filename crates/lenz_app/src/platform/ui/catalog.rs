//! Shell wording in the two supported UI languages.
use lenz_core::{Notice, OperationKind, UiLanguage, ValidationError};

use crate::platform::dialogs::PromptKind;

pub struct Texts {
    pub title: &'static str,
    pub mode: &'static str,
    pub mode_text: &'static str,
    pub mode_file: &'static str,
    pub mode_url: &'static str,
    pub api: &'static str,
    pub api_unknown: &'static str,
    pub api_checking: &'static str,
    pub api_connected: &'static str,
    pub api_unreachable: &'static str,
    pub default_endpoint: &'static str,
    pub ui_language: &'static str,
    pub text: &'static str,
    pub empty: &'static str,
    pub file: &'static str,
    pub no_file: &'static str,
    pub url: &'static str,
    pub ai_filter: &'static str,
    pub on: &'static str,
    pub off: &'static str,
    pub not_fetched: &'static str,
    pub fetching: &'static str,
    pub fetched: &'static str,
    pub editing: &'static str,
    pub page_title: &'static str,
    pub source: &'static str,
    pub preview: &'static str,
    pub edit_buffer: &'static str,
    pub options: &'static str,
    pub length: &'static str,
    pub format: &'static str,
    pub output_language: &'static str,
    pub summary: &'static str,
    pub keywords: &'static str,
    pub detected_language: &'static str,
    pub export: &'static str,
    pub loading: &'static str,
    pub failed: &'static str,
    pub notice: &'static str,
    pub unknown_command: &'static str,
    pub help_hint: &'static str,
    pub help: &'static str,
}

const KO: Texts = Texts {
    title: "콘텐츠 렌즈",
    mode: "입력 모드",
    mode_text: "텍스트",
    mode_file: "파일",
    mode_url: "URL",
    api: "API",
    api_unknown: "확인 전",
    api_checking: "확인 중",
    api_connected: "연결됨",
    api_unreachable: "연결 안 됨",
    default_endpoint: "기본 서버",
    ui_language: "언어",
    text: "텍스트",
    empty: "(비어 있음)",
    file: "파일",
    no_file: "(선택 안 됨)",
    url: "URL",
    ai_filter: "AI 필터",
    on: "켬",
    off: "끔",
    not_fetched: "가져오지 않음",
    fetching: "가져오는 중",
    fetched: "가져옴",
    editing: "편집 중",
    page_title: "제목",
    source: "출처",
    preview: "미리보기",
    edit_buffer: "편집 내용",
    options: "옵션",
    length: "길이",
    format: "형식",
    output_language: "요약 언어",
    summary: "요약",
    keywords: "키워드",
    detected_language: "감지된 언어",
    export: "내보내기",
    loading: "처리 중...",
    failed: "실패",
    notice: "알림",
    unknown_command: "알 수 없는 명령",
    help_hint: "'help'를 입력하면 명령 목록을 볼 수 있습니다.",
    help: "\
명령 목록:
  mode text|file|url        입력 모드 선택
  text <내용>               요약할 텍스트 입력 (\\n 은 줄바꿈)
  file                      파일 선택
  url <주소>                URL 입력
  fetch                     URL 내용 가져오기
  filter on|off             AI 필터 사용 여부
  edit / buffer <내용>      가져온 내용 편집
  save-edit / cancel-edit   편집 저장 / 취소
  length short|medium|long  요약 길이
  format paragraph|bullet|structured  요약 형식
  lang <코드>               요약 언어 (auto 또는 ko, en ...)
  summarize                 요약하기
  keywords                  키워드 추출
  detect                    언어 감지
  export                    요약 파일로 저장
  ui-lang ko|en             화면 언어
  endpoint <주소>|default   API 서버 주소
  status                    API 연결 확인
  dismiss                   알림 닫기
  help / quit",
};

const EN: Texts = Texts {
    title: "Contents Lenz",
    mode: "Input mode",
    mode_text: "Text",
    mode_file: "File",
    mode_url: "URL",
    api: "API",
    api_unknown: "not checked",
    api_checking: "checking",
    api_connected: "connected",
    api_unreachable: "unreachable",
    default_endpoint: "default server",
    ui_language: "Language",
    text: "Text",
    empty: "(empty)",
    file: "File",
    no_file: "(none selected)",
    url: "URL",
    ai_filter: "AI filter",
    on: "on",
    off: "off",
    not_fetched: "not fetched",
    fetching: "fetching",
    fetched: "fetched",
    editing: "editing",
    page_title: "Title",
    source: "Source",
    preview: "Preview",
    edit_buffer: "Edit buffer",
    options: "Options",
    length: "length",
    format: "format",
    output_language: "language",
    summary: "Summary",
    keywords: "Keywords",
    detected_language: "Detected language",
    export: "Export",
    loading: "working...",
    failed: "failed",
    notice: "Notice",
    unknown_command: "Unknown command",
    help_hint: "Type 'help' for the list of commands.",
    help: "\
Commands:
  mode text|file|url        choose the input mode
  text <content>            text to summarize (\\n for a line break)
  file                      pick a file
  url <address>             set the URL
  fetch                     fetch the page content
  filter on|off             toggle the AI content filter
  edit / buffer <content>   edit the fetched content
  save-edit / cancel-edit   keep or drop the edit
  length short|medium|long  summary length
  format paragraph|bullet|structured  summary format
  lang <code>               summary language (auto, or ko, en ...)
  summarize                 summarize the active input
  keywords                  extract keywords
  detect                    detect the language
  export                    save the summary to a file
  ui-lang ko|en             shell language
  endpoint <url>|default    API server address
  status                    check the API connection
  dismiss                   close the notice
  help / quit",
};

pub fn texts(language: UiLanguage) -> &'static Texts {
    match language {
        UiLanguage::Ko => &KO,
        UiLanguage::En => &EN,
    }
}

pub fn notice_text(language: UiLanguage, notice: &Notice) -> String {
    let ko = language == UiLanguage::Ko;
    let pick = |ko_text: &str, en_text: &str| -> String {
        (if ko { ko_text } else { en_text }).to_string()
    };
    match notice {
        Notice::Validation(err) => validation_text(ko, err),
        Notice::FetchFailed { message } => {
            if ko {
                format!("URL 내용을 가져오지 못했습니다: {message}")
            } else {
                format!("Could not fetch the page: {message}")
            }
        }
        Notice::OperationFailed { kind, message } => {
            let what = match (kind, ko) {
                (OperationKind::Summarize, true) => "요약",
                (OperationKind::Summarize, false) => "Summarizing",
                (OperationKind::Keywords, true) => "키워드 추출",
                (OperationKind::Keywords, false) => "Keyword extraction",
                (OperationKind::DetectLanguage, true) => "언어 감지",
                (OperationKind::DetectLanguage, false) => "Language detection",
                (OperationKind::Export, true) => "저장",
                (OperationKind::Export, false) => "Saving",
            };
            if ko {
                format!("{what} 실패: {message}")
            } else {
                format!("{what} failed: {message}")
            }
        }
        Notice::FileSelectionFailed { message } => {
            if ko {
                format!("파일을 선택하지 못했습니다: {message}")
            } else {
                format!("Could not select the file: {message}")
            }
        }
        Notice::ExportSaved { path } => {
            if ko {
                format!("저장했습니다: {}", path.display())
            } else {
                format!("Saved to {}", path.display())
            }
        }
        Notice::SettingsSaved => pick("설정을 저장했습니다.", "Settings saved."),
        Notice::SettingsFailed { message } => {
            if ko {
                format!("설정을 저장하지 못했습니다: {message}")
            } else {
                format!("Could not save settings: {message}")
            }
        }
    }
}

fn validation_text(ko: bool, err: &ValidationError) -> String {
    let (ko_text, en_text) = match err {
        ValidationError::EmptyText => ("요약할 텍스트를 입력하세요.", "Enter some text first."),
        ValidationError::NoFileSelected => ("파일을 먼저 선택하세요.", "Select a file first."),
        ValidationError::EmptyUrl => ("URL을 입력하세요.", "Enter a URL first."),
        ValidationError::NothingFetched => (
            "URL 내용을 먼저 가져오세요.",
            "Fetch the page content first.",
        ),
        ValidationError::KeywordsUnavailableForFile => (
            "파일 모드에서는 키워드를 따로 추출할 수 없습니다. 요약하면 자동으로 추출됩니다.",
            "Keywords cannot be extracted from a file directly; summarize it instead.",
        ),
        ValidationError::DetectUnavailableForFile => (
            "파일 모드에서는 언어 감지를 할 수 없습니다.",
            "Language detection is not available for files.",
        ),
        ValidationError::NotFetched => (
            "편집할 내용이 없습니다. 먼저 가져오세요.",
            "Nothing to edit yet; fetch the page first.",
        ),
        ValidationError::NotEditing => ("편집 중이 아닙니다.", "Not editing."),
        ValidationError::EditInProgress => (
            "편집을 저장하거나 취소한 뒤 다시 가져오세요.",
            "Save or cancel the edit before fetching again.",
        ),
        ValidationError::FetchInProgress => ("이미 가져오는 중입니다.", "A fetch is already running."),
        ValidationError::NoSummary => ("저장할 요약이 없습니다.", "There is no summary to save."),
        ValidationError::UnsupportedOutputLanguage(code) => {
            return if ko {
                format!("지원하지 않는 요약 언어입니다: {code}")
            } else {
                format!("Unsupported summary language: {code}")
            };
        }
        ValidationError::UnsupportedUiLanguage(code) => {
            return if ko {
                format!("지원하지 않는 화면 언어입니다: {code}")
            } else {
                format!("Unsupported UI language: {code}")
            };
        }
        ValidationError::InvalidEndpoint(value) => {
            return if ko {
                format!("올바른 http(s) 주소가 아닙니다: {value}")
            } else {
                format!("Not an http(s) address: {value}")
            };
        }
    };
    (if ko { ko_text } else { en_text }).to_string()
}

pub fn prompt_text(language: UiLanguage, kind: &PromptKind) -> String {
    let ko = language == UiLanguage::Ko;
    match kind {
        PromptKind::OpenFile => {
            if ko {
                "요약할 파일 경로 (빈 줄이면 취소):".to_string()
            } else {
                "Path of the file to summarize (empty line cancels):".to_string()
            }
        }
        PromptKind::SaveFile { suggested_name } => {
            if ko {
                format!("저장할 경로, 예: {suggested_name} (빈 줄이면 취소):")
            } else {
                format!("Save to path, e.g. {suggested_name} (empty line cancels):")
            }
        }
    }
}
