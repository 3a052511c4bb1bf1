//! Common test utilities for harness integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use bitsafe_smoke::{Harness, HarnessConfig};

/// In-memory status-check collection behind `api/status`.
///
/// Created records only show up in listings once `visibility_lag` has
/// passed, which mimics a store with asynchronous writes.
#[derive(Clone, Default)]
pub struct StatusStore {
    records: Arc<Mutex<Vec<(Instant, Value)>>>,
    next_id: Arc<AtomicU64>,
    visibility_lag: Duration,
    numeric_ids: bool,
}

impl StatusStore {
    pub fn with_lag(visibility_lag: Duration) -> Self {
        Self {
            visibility_lag,
            ..Self::default()
        }
    }

    /// A store that hands out integer ids, as some document stores do.
    pub fn with_numeric_ids() -> Self {
        Self {
            numeric_ids: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Respond for StatusStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.method.as_str() {
            "POST" => {
                let Ok(body) = request.body_json::<Value>() else {
                    return ResponseTemplate::new(422);
                };
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let id = if self.numeric_ids {
                    json!(id)
                } else {
                    json!(format!("status-{id}"))
                };
                let record = json!({
                    "id": id,
                    "client_name": body["client_name"],
                    "timestamp": "2026-10-18T12:00:00Z"
                });
                self.records
                    .lock()
                    .unwrap()
                    .push((Instant::now(), record.clone()));
                ResponseTemplate::new(200).set_body_json(record)
            }
            "GET" => {
                let visible: Vec<Value> = self
                    .records
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|(created, _)| created.elapsed() >= self.visibility_lag)
                    .map(|(_, record)| record.clone())
                    .collect();
                ResponseTemplate::new(200).set_body_json(visible)
            }
            _ => ResponseTemplate::new(405),
        }
    }
}

/// A mock BitSafe backend.
pub struct FakeBitSafe {
    pub server: MockServer,
    pub store: StatusStore,
}

impl FakeBitSafe {
    /// A well-behaved service with CORS enabled and immediate writes.
    pub async fn start() -> Self {
        Self::start_with(StatusStore::default(), true).await
    }

    /// A service using `store` for `api/status`, optionally without CORS.
    pub async fn start_with(store: StatusStore, cors: bool) -> Self {
        let server = MockServer::start().await;

        let mut root = ResponseTemplate::new(200).set_body_json(json!({"message": "Hello World"}));
        if cors {
            root = root.insert_header("access-control-allow-origin", "*");
        }
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(root)
            .mount(&server)
            .await;

        Mock::given(path("/api/status"))
            .respond_with(store.clone())
            .mount(&server)
            .await;

        Self { server, store }
    }

    /// A harness pointed at this service.
    pub fn harness(&self, settle_delay_ms: u64) -> Harness {
        harness_for(&self.server.uri(), settle_delay_ms)
    }
}

/// A harness for an arbitrary base URL.
pub fn harness_for(base_url: &str, settle_delay_ms: u64) -> Harness {
    let config = HarnessConfig {
        timeout_seconds: 5,
        ..HarnessConfig::default()
    }
    .with_base_url(base_url)
    .with_settle_delay_ms(settle_delay_ms);
    Harness::new(&config).expect("Failed to build harness")
}

/// A base URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{addr}")
}
