//! Contract tests for RegistryClient against a mocked registry and schema host.

use presence_lint::config::LintConfig;
use presence_lint::registry::{Registry, RegistryClient, RegistryError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RegistryClient {
    let config = LintConfig::new(
        &format!("{}/v3", server.uri()),
        &format!("{}/metadata/1.10", server.uri()),
        "websites",
        5,
    )
    .unwrap();
    RegistryClient::new(&config).unwrap()
}

#[tokio::test]
async fn published_returns_matching_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3"))
        .and(body_partial_json(json!({"variables": {"service": "Netflix"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "presences": [
                    {"metadata": {"service": "Netflix", "version": "2.3.1"}}
                ]
            }
        })))
        .mount(&server)
        .await;

    let published = client(&server).published("Netflix").await.unwrap().unwrap();
    assert_eq!(published.service, "Netflix");
    assert_eq!(published.version, "2.3.1");
}

#[tokio::test]
async fn published_is_none_for_new_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"presences": []}})),
        )
        .mount(&server)
        .await;

    assert!(client(&server).published("Brand New").await.unwrap().is_none());
}

#[tokio::test]
async fn languages_keep_registry_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3"))
        .and(body_string_contains("langFiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"langFiles": [{"lang": "en"}, {"lang": "nl"}, {"lang": "ja_JP"}]}
        })))
        .mount(&server)
        .await;

    let languages = client(&server).languages().await.unwrap();
    assert_eq!(languages, vec!["en", "nl", "ja_JP"]);
}

#[tokio::test]
async fn latest_schema_uses_document_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metadata/1.10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "https://schemas.premid.app/metadata/1.10",
            "type": "object"
        })))
        .mount(&server)
        .await;

    let schema = client(&server).latest_schema().await.unwrap();
    assert_eq!(schema.id, "https://schemas.premid.app/metadata/1.10");
    assert_eq!(schema.document["type"], "object");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).published("Netflix").await.unwrap_err();
    match err {
        RegistryError::Status { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn graphql_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "rate limited"}, {"message": "try later"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).languages().await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Query { ref message, .. } if message == "rate limited; try later"
    ));
}
