//! Integration tests for the transport and protocol adapters using wiremock
//!
//! These tests verify credential selection, envelope encoding and error
//! classification against mocked Homarr endpoints.

use homarrctl::homarr::http::AuthMode;
use homarrctl::{ConnectionConfig, HomarrClient, HomarrError, RemoteError};
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: Option<&str>, token: Option<&str>) -> HomarrClient {
    let config = ConnectionConfig::new(
        server.uri(),
        api_key.map(String::from),
        token.map(String::from),
    )
    .expect("valid config");
    HomarrClient::new(config).expect("client")
}

fn ok_envelope(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": { "data": { "json": payload } } }))
}

/// Test module for transport behaviour
mod transport_tests {
    use super::*;

    /// REST calls carry the API key header and never the session cookie
    #[tokio::test]
    async fn test_rest_sends_only_api_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .and(header("ApiKey", "key-1"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-1"), Some("tok-1"));
        let value = client.rest().query("/api/apps").await.expect("query");
        assert_eq!(value, json!([]));

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("cookie").is_none());
    }

    /// tRPC calls carry the session cookie and never the API key
    #[tokio::test]
    async fn test_rpc_sends_only_session_cookie() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/trpc/group.getAll"))
            .and(header("Cookie", "authjs.session-token=tok-1"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ok_envelope(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-1"), Some("tok-1"));
        client
            .trpc()
            .query("group.getAll", None)
            .await
            .expect("query");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("apikey").is_none());
    }

    /// A missing credential fails before any request is sent
    #[tokio::test]
    async fn test_missing_session_token_sends_nothing() {
        let server = MockServer::start().await;

        let client = client_for(&server, Some("key-1"), None);
        let err = client
            .trpc()
            .query("group.getAll", None)
            .await
            .unwrap_err();

        assert!(matches!(err, HomarrError::MissingCredential { mode: AuthMode::Rpc }));
        let requests = server.received_requests().await.expect("recording enabled");
        assert!(requests.is_empty());
    }

    /// Connection failures surface as transport errors
    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let config = ConnectionConfig::new(uri, Some("key-1".into()), None).unwrap();
        let client = HomarrClient::new(config).unwrap();
        let err = client.rest().query("/api/apps").await.unwrap_err();

        assert!(matches!(err, HomarrError::Transport(_)));
    }
}

/// Test module for the REST adapter
mod rest_tests {
    use super::*;

    /// Status >= 400 is a remote error carrying status and raw body, even
    /// when the body is valid JSON
    #[tokio::test]
    async fn test_error_status_keeps_raw_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"App not found"}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-1"), None);
        let err = client.rest().query("/api/apps/missing").await.unwrap_err();

        match err {
            HomarrError::Remote(RemoteError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, r#"{"error":"App not found"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Test POST request with JSON body, no envelope
    #[tokio::test]
    async fn test_mutate_sends_plain_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/apps"))
            .and(body_json(json!({"name": "Grafana"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-1"), None);
        let value = client
            .rest()
            .mutate(Method::POST, "/api/apps", Some(&json!({"name": "Grafana"})))
            .await
            .expect("mutate");
        assert_eq!(value["id"], "1");
    }

    /// Test empty response handling
    #[tokio::test]
    async fn test_empty_response_is_null() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/apps/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-1"), None);
        let value = client
            .rest()
            .mutate::<Value>(Method::DELETE, "/api/apps/1", None)
            .await
            .expect("mutate");
        assert_eq!(value, Value::Null);
    }
}

/// Test module for the tRPC adapter
mod trpc_tests {
    use super::*;

    /// Query input is sent as a single `input` parameter wrapping the value
    /// in `{"json": ...}`
    #[tokio::test]
    async fn test_query_input_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/trpc/integration.byId"))
            .and(query_param("input", r#"{"json":{"id":"i-1"}}"#))
            .respond_with(ok_envelope(json!({"id": "i-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("tok-1"));
        let value = client
            .trpc()
            .query("integration.byId", Some(&json!({"id": "i-1"})))
            .await
            .expect("query");
        assert_eq!(value, json!({"id": "i-1"}));
    }

    /// Mutations POST the same envelope as the body
    #[tokio::test]
    async fn test_mutation_body_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/trpc/group.deleteGroup"))
            .and(body_json(json!({"json": {"id": "g-1"}})))
            .respond_with(ok_envelope(Value::Null))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("tok-1"));
        let value = client
            .trpc()
            .mutate("group.deleteGroup", &json!({"id": "g-1"}))
            .await
            .expect("mutate");
        assert_eq!(value, Value::Null);
    }

    /// An envelope error on HTTP 200 is still an error
    #[tokio::test]
    async fn test_in_band_error_on_200() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/trpc/group.createGroup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"json": {"message": "Group name already taken", "code": -32600}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("tok-1"));
        let err = client
            .trpc()
            .mutate("group.createGroup", &json!({"name": "Admins"}))
            .await
            .unwrap_err();

        match err {
            HomarrError::Remote(RemoteError::Rpc { message, code }) => {
                assert_eq!(message, "Group name already taken");
                assert_eq!(code, Some(-32600));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Envelope errors on error statuses keep the server message
    #[tokio::test]
    async fn test_in_band_error_on_401() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/trpc/serverSettings.getAll"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"json": {"message": "UNAUTHORIZED", "code": -32001}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("expired"));
        let err = client
            .trpc()
            .query("serverSettings.getAll", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HomarrError::Remote(RemoteError::Rpc { ref message, code: Some(-32001) }) if message == "UNAUTHORIZED"
        ));
        assert!(err.user_hint().is_some());
    }

    /// A proxy error page is not an envelope; report status and body
    #[tokio::test]
    async fn test_non_envelope_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/trpc/board.getAllBoards"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("tok-1"));
        let err = client
            .trpc()
            .query("board.getAllBoards", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HomarrError::Remote(RemoteError::Status { status: 502, .. })
        ));
    }

    /// Malformed JSON on success is a decode error
    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/trpc/group.getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, None, Some("tok-1"));
        let err = client
            .trpc()
            .query("group.getAll", None)
            .await
            .unwrap_err();

        assert!(matches!(err, HomarrError::Decode { .. }));
    }
}
