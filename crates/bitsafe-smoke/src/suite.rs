//! The fixed BitSafe smoke test sequence.

use bitsafe_client::{ApiRequest, Method};
use chrono::Utc;
use serde_json::{json, Value};

use crate::harness::{Harness, TestCase};

/// Origin used to simulate a cross-origin browser request.
pub const FOREIGN_ORIGIN: &str = "https://example.com";

/// Header the CORS check requires on the response.
pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// Test names, in execution order.
pub mod names {
    /// `GET api`
    pub const ROOT: &str = "Root API Endpoint";
    /// `GET api/status`
    pub const LIST_STATUS: &str = "GET Status Endpoint";
    /// `POST api/status`
    pub const CREATE_STATUS: &str = "POST Status Endpoint";
    /// Create, wait, list.
    pub const PERSISTENCE: &str = "Status Persistence";
    /// Cross-origin request headers.
    pub const CORS: &str = "CORS Headers";
    /// Unknown route.
    pub const NOT_FOUND: &str = "Non-existent Endpoint";
    /// Create, wait, list, labeled for the backing store.
    pub const DATABASE: &str = "Database Round Trip";
}

/// Run every test in order.
pub async fn run_all(harness: &mut Harness) {
    harness.run_test(root_endpoint()).await;
    harness.run_test(list_status_checks()).await;
    harness
        .run_test(create_status_check(&unique_client_name("test_client")))
        .await;
    persistence_check(harness, names::PERSISTENCE, "persist_client").await;
    cors_headers(harness).await;
    harness.run_test(nonexistent_endpoint()).await;
    persistence_check(harness, names::DATABASE, "mongo_client").await;
}

/// `GET api` must greet with "Hello World".
#[must_use]
pub fn root_endpoint() -> TestCase {
    TestCase::new(names::ROOT, Method::Get, "api", 200).with_validator(|body| {
        match body.get("message").and_then(Value::as_str) {
            Some("Hello World") => Ok("message is 'Hello World'".to_string()),
            Some(other) => Err(format!("Expected message 'Hello World', got '{other}'")),
            None => Err("response has no 'message' field".to_string()),
        }
    })
}

/// `GET api/status` must return a list.
#[must_use]
pub fn list_status_checks() -> TestCase {
    TestCase::new(names::LIST_STATUS, Method::Get, "api/status", 200).with_validator(|body| {
        body.as_array()
            .map(|checks| format!("{} status checks returned", checks.len()))
            .ok_or_else(|| "response is not a list".to_string())
    })
}

/// `POST api/status` must echo `client_name` and assign an `id`.
#[must_use]
pub fn create_status_check(client_name: &str) -> TestCase {
    create_case(names::CREATE_STATUS, client_name)
}

/// `GET api/nonexistent` must be a 404.
#[must_use]
pub fn nonexistent_endpoint() -> TestCase {
    TestCase::new(names::NOT_FOUND, Method::Get, "api/nonexistent", 404)
}

/// Create a status check, wait, and look for it in the listing.
pub async fn persistence_check(harness: &mut Harness, name: &str, prefix: &str) -> (bool, Value) {
    let client_name = unique_client_name(prefix);
    let create = create_case(&format!("{name} (create)"), &client_name);
    let read = listing_contains(
        &format!("{name} (read)"),
        client_name,
        harness.settle_delay().as_millis(),
    );
    harness.run_chained(name, create, read).await
}

/// Cross-origin `GET api` must carry `Access-Control-Allow-Origin`.
pub async fn cors_headers(harness: &mut Harness) -> bool {
    let request = ApiRequest::get("api")
        .with_header("Origin", FOREIGN_ORIGIN)
        .with_header("Access-Control-Request-Method", "GET")
        .with_header("Access-Control-Request-Headers", "Content-Type");
    harness
        .run_header_check(names::CORS, request, ALLOW_ORIGIN_HEADER)
        .await
}

/// `prefix` followed by the current UTC time to the second.
#[must_use]
pub fn unique_client_name(prefix: &str) -> String {
    format!("{prefix}_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}

fn create_case(name: &str, client_name: &str) -> TestCase {
    let expected = client_name.to_string();
    TestCase::new(name, Method::Post, "api/status", 200)
        .with_body(json!({ "client_name": client_name }))
        .with_validator(move |body| {
            if body.get("id").map_or(true, Value::is_null) {
                return Err("response has no 'id' field".to_string());
            }
            match body.get("client_name").and_then(Value::as_str) {
                Some(name) if name == expected => Ok(format!("created status check for {name}")),
                Some(name) => Err(format!("Expected client_name '{expected}', got '{name}'")),
                None => Err("response has no 'client_name' field".to_string()),
            }
        })
}

fn listing_contains(name: &str, client_name: String, waited_ms: u128) -> TestCase {
    TestCase::new(name, Method::Get, "api/status", 200).with_validator(move |body| {
        let Some(entries) = body.as_array() else {
            return Err("response is not a list".to_string());
        };
        let found = entries.iter().any(|entry| {
            entry.get("client_name").and_then(Value::as_str) == Some(client_name.as_str())
        });
        if found {
            Ok(format!("found {client_name} among {} status checks", entries.len()))
        } else {
            Err(format!(
                "status check {client_name} not found after {waited_ms} ms ({} entries listed)",
                entries.len()
            ))
        }
    })
}
