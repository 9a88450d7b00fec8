use cimedia_cli::{run, CliSettings, Command};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer, token: Option<&str>) -> CliSettings {
    CliSettings {
        username: Some("me@example.com".to_string()),
        password: Some("pw".to_string()),
        client_id: Some("cid".to_string()),
        client_secret: Some("cs".to_string()),
        workspace_id: "ws-1".to_string(),
        access_token: token.map(str::to_string),
        api_endpoint: server.uri(),
        io_endpoint: server.uri(),
    }
}

#[tokio::test]
async fn test_logs_in_then_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/assets/abc"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let command = Command::Delete {
        asset_ids: vec!["abc".to_string()],
    };
    run(&settings_for(&server, None), command).await.unwrap();
}

#[tokio::test]
async fn test_existing_token_skips_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspaces/ws-1/contents"))
        .and(header("authorization", "Bearer saved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    run(&settings_for(&server, Some("saved")), Command::Names)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_command_appends_log() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "assetId": "up-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "up-1", "name": "note.txt" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("note.txt");
    std::fs::write(&file, b"hello").unwrap();
    let log = dir.path().join("uploads.log");

    let command = Command::Upload {
        files: vec![file],
        log: log.clone(),
    };
    run(&settings_for(&server, Some("saved")), command)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("\tnote.txt\tup-1\t"));
}

#[tokio::test]
async fn test_failed_login_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = run(&settings_for(&server, None), Command::Login)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Login failed"));
}
