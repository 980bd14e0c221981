use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use lenz_engine::{
    ApiClient, BridgeGateway, BridgeTransport, ClientSettings, DialogError, DirectTransport,
    HostDialogs, ReqwestApiClient, SettingsStore, StoredSettings, SummaryInput, SummaryParams,
    Transport,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct FakeDialogs {
    open: Option<PathBuf>,
    save: Option<PathBuf>,
    suggested: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl HostDialogs for FakeDialogs {
    async fn pick_file_to_open(&self) -> Result<Option<PathBuf>, DialogError> {
        Ok(self.open.clone())
    }

    async fn pick_save_destination(
        &self,
        suggested_name: &str,
    ) -> Result<Option<PathBuf>, DialogError> {
        self.suggested.lock().unwrap().push(suggested_name.to_string());
        Ok(self.save.clone())
    }
}

struct Harness {
    gateway: Arc<BridgeGateway>,
    client: Arc<ReqwestApiClient>,
    dialogs: Arc<FakeDialogs>,
    _temp: TempDir,
    settings_path: PathBuf,
}

fn harness(server: &MockServer, dialogs: FakeDialogs, temp: TempDir) -> Harness {
    let client = Arc::new(
        ReqwestApiClient::new(ClientSettings::default().with_base_url(server.uri())).unwrap(),
    );
    let dialogs = Arc::new(dialogs);
    let settings_path = temp.path().join("config").join("settings.json");
    let gateway = Arc::new(BridgeGateway::new(
        client.clone(),
        dialogs.clone(),
        SettingsStore::new(settings_path.clone()),
        server.uri(),
    ));
    Harness {
        gateway,
        client,
        dialogs,
        _temp: temp,
        settings_path,
    }
}

#[tokio::test]
async fn unknown_operation_is_an_error_reply() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("readFile", json!({ "path": "/etc/passwd" })).await;
    assert_eq!(reply, json!({ "error": "unknown operation: readFile" }));
}

#[tokio::test]
async fn malformed_payload_is_an_error_reply() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("summarizeText", json!({ "content": 42 })).await;
    let message = reply["error"].as_str().unwrap();
    assert!(message.starts_with("invalid payload for summarizeText"));
}

#[tokio::test]
async fn summarize_text_reply_uses_bridge_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize/text"))
        .and(body_string_contains("length=short"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Hi.",
            "detected_language": "en",
            "detected_language_name": "English"
        })))
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h
        .gateway
        .invoke(
            "summarizeText",
            json!({
                "text": "hello world",
                "options": { "length": "short", "format": "bullet", "language": "auto" }
            }),
        )
        .await;
    assert_eq!(
        reply,
        json!({ "summary": "Hi.", "detectedLanguage": "en", "detectedLanguageName": "English" })
    );
}

#[tokio::test]
async fn api_failures_fold_into_error_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-url"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "detail": "Page is empty" })))
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("scrapeUrl", json!({ "url": "example.com" })).await;
    assert_eq!(reply, json!({ "error": "Page is empty" }));
}

#[tokio::test]
async fn api_status_reports_connection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("getApiStatus", Value::Null).await;
    assert_eq!(reply, json!({ "connected": true, "data": { "message": "ok" } }));
}

#[tokio::test]
async fn select_file_reports_cancel_and_choice() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());
    assert_eq!(
        h.gateway.invoke("selectFile", Value::Null).await,
        json!({ "canceled": true })
    );

    let dialogs = FakeDialogs {
        open: Some(PathBuf::from("/docs/report.pdf")),
        ..FakeDialogs::default()
    };
    let h = harness(&server, dialogs, TempDir::new().unwrap());
    assert_eq!(
        h.gateway.invoke("selectFile", Value::Null).await,
        json!({ "canceled": false, "path": "/docs/report.pdf" })
    );
}

#[tokio::test]
async fn save_file_exports_and_writes_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .and(body_string_contains(".md"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"# Hi".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("exports").join("out.md");
    let dialogs = FakeDialogs {
        save: Some(target.clone()),
        ..FakeDialogs::default()
    };
    let h = harness(&server, dialogs, temp);

    let reply = h
        .gateway
        .invoke("saveFile", json!({ "content": "Hi", "suggestedName": "summary.txt" }))
        .await;
    assert_eq!(
        reply,
        json!({ "canceled": false, "savedPath": target.to_str().unwrap() })
    );
    assert_eq!(std::fs::read(&target).unwrap(), b"# Hi".to_vec());
    assert_eq!(*h.dialogs.suggested.lock().unwrap(), vec!["summary.txt".to_string()]);
}

#[tokio::test]
async fn canceled_save_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("saveFile", json!({ "content": "Hi" })).await;
    assert_eq!(reply, json!({ "canceled": true }));
}

#[tokio::test]
async fn failed_export_reports_error_in_save_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "Unsupported format" })))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.xyz");
    let dialogs = FakeDialogs {
        save: Some(target.clone()),
        ..FakeDialogs::default()
    };
    let h = harness(&server, dialogs, temp);

    let reply = h.gateway.invoke("saveFile", json!({ "content": "Hi" })).await;
    assert_eq!(reply, json!({ "canceled": false, "error": "Unsupported format" }));
    assert!(!target.exists());
}

#[tokio::test]
async fn save_settings_persists_and_reconfigures_endpoint() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h
        .gateway
        .invoke(
            "saveSettings",
            json!({ "language": "en", "apiUrl": "http://localhost:8000/" }),
        )
        .await;
    assert_eq!(reply["language"], "en");
    assert_eq!(h.client.base_url(), "http://localhost:8000");
    assert!(h.settings_path.exists());

    let reply = h.gateway.invoke("getSettings", Value::Null).await;
    assert_eq!(reply, json!({ "language": "en", "apiUrl": "http://localhost:8000/" }));

    h.gateway
        .invoke("saveSettings", json!({ "language": "en" }))
        .await;
    assert_eq!(h.client.base_url(), server.uri());
}

#[tokio::test]
async fn save_settings_rejects_unknown_language() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h.gateway.invoke("saveSettings", json!({ "language": "fr" })).await;
    assert_eq!(reply, json!({ "error": "unsupported language: fr" }));
    assert!(!h.settings_path.exists());
}

#[tokio::test]
async fn bridge_transport_round_trips_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize/url"))
        .and(body_string_contains("url=https%3A%2F%2Fexample.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "Page." })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/keywords/text"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "detail": "Busy" })))
        .mount(&server)
        .await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());
    let transport = BridgeTransport::new(h.gateway.clone());

    let summary = transport
        .summarize(&SummaryInput::Url("example.com".into()), &SummaryParams::default())
        .await
        .unwrap();
    assert_eq!(summary.summary, "Page.");

    let err = transport.extract_keywords("text", 10, "auto").await.unwrap_err();
    assert_eq!(err.message, "Busy");

    assert_eq!(transport.select_file().await.unwrap(), None);

    transport
        .save_settings(&StoredSettings {
            language: "en".into(),
            api_url: None,
        })
        .await
        .unwrap();
    assert_eq!(transport.load_settings().await.unwrap().language, "en");
}

#[tokio::test]
async fn direct_transport_uses_client_and_dialogs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-language"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "en" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .and(body_string_contains(".txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"plain".to_vec()))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("summary");
    let client = Arc::new(
        ReqwestApiClient::new(ClientSettings::default().with_base_url(server.uri())).unwrap(),
    );
    let dialogs = Arc::new(FakeDialogs {
        save: Some(target.clone()),
        ..FakeDialogs::default()
    });
    let transport = DirectTransport::new(
        client.clone(),
        dialogs,
        SettingsStore::new(temp.path().join("settings.json")),
        server.uri(),
    );

    assert_eq!(transport.detect_language("hello").await.unwrap(), "en");
    let saved = transport.save_file("plain", "summary.txt").await.unwrap();
    assert_eq!(saved, Some(target.clone()));
    assert_eq!(std::fs::read(&target).unwrap(), b"plain".to_vec());

    transport.set_base_url(Some("http://localhost:9/")).await.unwrap();
    assert_eq!(client.base_url(), "http://localhost:9");
    transport.set_base_url(None).await.unwrap();
    assert_eq!(client.base_url(), server.uri());
}

#[tokio::test]
async fn language_only_save_keeps_current_endpoint() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());
    h.client.set_base_url("http://override.local:1");

    let reply = h.gateway.invoke("saveSettings", json!({ "language": "en" })).await;
    assert_eq!(reply, json!({ "language": "en" }));
    assert_eq!(h.client.base_url(), "http://override.local:1");
}

#[tokio::test]
async fn set_api_url_restores_fallback_when_blank() {
    let server = MockServer::start().await;
    let h = harness(&server, FakeDialogs::default(), TempDir::new().unwrap());

    let reply = h
        .gateway
        .invoke("setApiUrl", json!({ "apiUrl": "http://elsewhere.local:3/" }))
        .await;
    assert_eq!(reply, json!({ "apiUrl": "http://elsewhere.local:3" }));

    let reply = h.gateway.invoke("setApiUrl", json!({ "apiUrl": "  " })).await;
    assert_eq!(reply, json!({ "apiUrl": server.uri() }));
}

/// Same endpoint sequence through both transports: a saved endpoint that is
/// already on disk still takes over from the startup override.
#[tokio::test]
async fn explicit_endpoint_save_repoints_both_transports() {
    const STARTUP: &str = "http://cli.local:2";
    const SAVED: &str = "http://saved.local:1";

    async fn run(transport: &dyn Transport) {
        transport.set_base_url(Some(SAVED)).await.unwrap();
        transport
            .save_settings(&StoredSettings {
                language: "ko".into(),
                api_url: Some(SAVED.into()),
            })
            .await
            .unwrap();
    }

    let temp = TempDir::new().unwrap();
    let stored = StoredSettings {
        language: "ko".into(),
        api_url: Some(SAVED.into()),
    };

    let bridge_store = SettingsStore::new(temp.path().join("bridge.json"));
    bridge_store.save(&stored).unwrap();
    let bridge_client = Arc::new(
        ReqwestApiClient::new(ClientSettings::default().with_base_url(STARTUP)).unwrap(),
    );
    let gateway = BridgeGateway::new(
        bridge_client.clone(),
        Arc::new(FakeDialogs::default()),
        bridge_store,
        STARTUP,
    );
    run(&BridgeTransport::new(Arc::new(gateway))).await;

    let direct_store = SettingsStore::new(temp.path().join("direct.json"));
    direct_store.save(&stored).unwrap();
    let direct_client = Arc::new(
        ReqwestApiClient::new(ClientSettings::default().with_base_url(STARTUP)).unwrap(),
    );
    let direct = DirectTransport::new(
        direct_client.clone(),
        Arc::new(FakeDialogs::default()),
        direct_store,
        STARTUP,
    );
    run(&direct).await;

    assert_eq!(bridge_client.base_url(), SAVED);
    assert_eq!(direct_client.base_url(), SAVED);
}
