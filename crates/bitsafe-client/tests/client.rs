//! Client tests against a mocked BitSafe backend.

use bitsafe_client::{ApiRequest, BitSafeClient, ClientError, ClientOptions};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn send_returns_non_success_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = BitSafeClient::new(server.uri()).unwrap();
    let response = client.send(&ApiRequest::get("api/nonexistent")).await.unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "Not Found");
}

#[tokio::test]
async fn send_sets_json_content_type_and_extra_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("content-type", "application/json"))
        .and(header("origin", "https://example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("access-control-allow-origin", "*")
                .set_body_json(json!({"message": "Hello World"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BitSafeClient::new(server.uri()).unwrap();
    let request = ApiRequest::get("api").with_header("Origin", "https://example.com");
    let response = client.send(&request).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.has_header("Access-Control-Allow-Origin"));
}

#[tokio::test]
async fn root_decodes_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Hello World"})))
        .mount(&server)
        .await;

    let client = BitSafeClient::new(server.uri()).unwrap();
    let root = client.root().await.unwrap();

    assert_eq!(root.message, "Hello World");
}

#[tokio::test]
async fn create_status_check_posts_client_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .and(body_json(json!({"client_name": "unit_client"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc-123",
            "client_name": "unit_client",
            "timestamp": "2026-10-18T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BitSafeClient::new(server.uri()).unwrap();
    let created = client.create_status_check("unit_client").await.unwrap();

    assert_eq!(created.id, "abc-123");
    assert_eq!(created.client_name, "unit_client");
}

#[tokio::test]
async fn list_status_checks_maps_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BitSafeClient::new(server.uri()).unwrap();
    let err = client.list_status_checks().await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP 500");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        BitSafeClient::with_options(format!("http://{addr}"), ClientOptions::with_timeout(2))
            .unwrap();
    let err = client.send(&ApiRequest::get("api")).await.unwrap_err();

    assert!(err.is_transport());
}
