//! Generic request runner and bookkeeping.

use std::error::Error as _;
use std::fmt::Write as _;
use std::time::Duration;

use bitsafe_client::{ApiRequest, BitSafeClient, ClientError, ClientOptions, Method};
use serde_json::{json, Value};

use crate::config::HarnessConfig;
use crate::report::{FailureKind, RunSummary, TestResult};

/// Longest response excerpt printed after a status mismatch.
const SNIPPET_CHARS: usize = 200;

/// Predicate over a decoded JSON body. `Ok` carries a success message,
/// `Err` the reason the body was rejected.
pub type Validator = Box<dyn Fn(&Value) -> Result<String, String> + Send + Sync>;

/// One HTTP request and what it is expected to return.
pub struct TestCase {
    /// Name used in progress output and the summary.
    pub name: String,
    /// Request to send.
    pub request: ApiRequest,
    /// Status code the response must have.
    pub expected_status: u16,
    /// Optional check on the decoded body.
    pub validator: Option<Validator>,
}

impl TestCase {
    /// Create a test case without body, extra headers or validator.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            request: ApiRequest::new(method, path),
            expected_status,
            validator: None,
        }
    }

    /// Send `body` as JSON.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.request = self.request.with_body(body);
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    /// Check the decoded body with `validator`.
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl Fn(&Value) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("request", &self.request)
            .field("expected_status", &self.expected_status)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Runs test cases one at a time and keeps the run summary.
#[derive(Debug)]
pub struct Harness {
    client: BitSafeClient,
    settle_delay: Duration,
    summary: RunSummary,
}

impl Harness {
    /// Build a harness for the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &HarnessConfig) -> Result<Self, ClientError> {
        let client = BitSafeClient::with_options(
            &config.base_url,
            ClientOptions::with_timeout(config.timeout_seconds),
        )?;

        Ok(Self {
            client,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            summary: RunSummary::new(),
        })
    }

    /// Pause applied between a create and the read that checks it.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Results so far.
    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Finish the run and hand back the summary.
    #[must_use]
    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Run one test case and record its result.
    ///
    /// Returns whether it passed and the decoded body (an empty object when
    /// there is none), so a caller can chain a dependent request.
    pub async fn run_test(&mut self, case: TestCase) -> (bool, Value) {
        announce(&case.name);
        let result = self.execute(&case).await;
        self.conclude(&case.name, result)
    }

    /// Run `create`, wait the settle delay, then run `read`, recording a
    /// single result under `name`. A failed `create` skips `read`.
    pub async fn run_chained(&mut self, name: &str, create: TestCase, read: TestCase) -> (bool, Value) {
        announce(name);

        let created = self.execute(&create).await;
        if !created.is_passed() {
            let kind = created.failure.unwrap_or(FailureKind::Validation);
            let result = TestResult::failed(
                kind,
                format!("{} step failed: {}", create.name, created.message),
            );
            return self.conclude(name, result);
        }
        tracing::debug!(test = name, delay = ?self.settle_delay, "Waiting before read");
        tokio::time::sleep(self.settle_delay).await;

        let result = self.execute(&read).await;
        self.conclude(name, result)
    }

    /// Send `request` and pass if the response carries `header`.
    /// The status code and body are not checked.
    pub async fn run_header_check(&mut self, name: &str, request: ApiRequest, header: &str) -> bool {
        announce(name);

        let result = match self.client.send(&request).await {
            Err(err) => transport_failure(&err),
            Ok(response) if response.has_header(header) => {
                let value = response.headers.get(header).and_then(|v| v.to_str().ok());
                TestResult::passed(format!("{header}: {}", value.unwrap_or("<binary>")), None)
            }
            Ok(response) => TestResult::failed(
                FailureKind::MissingHeader,
                format!("{header} header missing (status {})", response.status),
            ),
        };

        self.conclude(name, result).0
    }

    /// Send the request and judge the response, without touching the summary.
    pub async fn execute(&self, case: &TestCase) -> TestResult {
        let response = match self.client.send(&case.request).await {
            Ok(response) => response,
            Err(err) => return transport_failure(&err),
        };

        if response.status != case.expected_status {
            println!("   Response: {}", snippet(&response.body));
            return TestResult::failed(
                FailureKind::StatusMismatch,
                format!("Expected {}, got {}", case.expected_status, response.status),
            );
        }

        let Some(validate) = &case.validator else {
            return TestResult::passed(format!("Status: {}", response.status), response.json().ok());
        };

        let Ok(body) = response.json() else {
            return TestResult::failed(FailureKind::MalformedJson, "response is not valid JSON");
        };

        match validate(&body) {
            Ok(message) => TestResult::passed(message, Some(body)),
            Err(message) => TestResult::failed(FailureKind::Validation, message).with_response(body),
        }
    }

    fn conclude(&mut self, name: &str, result: TestResult) -> (bool, Value) {
        let passed = result.is_passed();
        if passed {
            println!("✅ Passed - {}", result.message);
        } else {
            println!("❌ Failed - {}", result.message);
        }
        tracing::debug!(test = name, passed, failure = ?result.failure, "Recorded result");

        let body = result.response.clone().unwrap_or_else(|| json!({}));
        self.summary.record(name, result);
        (passed, body)
    }
}

fn announce(name: &str) {
    println!("\n🔍 Testing {name}...");
}

fn transport_failure(err: &ClientError) -> TestResult {
    TestResult::failed(FailureKind::Transport, format!("Error: {}", describe(err)))
}

/// Error text including its causes, without repeating text already shown.
fn describe(err: &ClientError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            write!(&mut message, ": {text}").ok();
        }
        source = cause.source();
    }
    message
}

fn snippet(body: &str) -> String {
    let mut excerpt: String = body.chars().take(SNIPPET_CHARS).collect();
    if body.chars().count() > SNIPPET_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}
