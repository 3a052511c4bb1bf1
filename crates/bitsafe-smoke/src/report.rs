//! Test results and the run summary.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// All checks held.
    Passed,
    /// At least one check failed.
    Failed,
}

/// Why a test failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Observed status differs from the expected one.
    StatusMismatch,
    /// The decoded body did not satisfy the test's validator.
    Validation,
    /// A validator was supplied but the body is not JSON.
    MalformedJson,
    /// No response was received.
    Transport,
    /// A required response header was absent.
    MissingHeader,
}

/// Result of running one test case.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Passed or failed.
    pub status: TestStatus,
    /// Human-readable detail: the validator's message or the failure reason.
    pub message: String,
    /// Failure category, set only for failed tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Decoded response body, when one was obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl TestResult {
    /// A passing result.
    #[must_use]
    pub fn passed(message: impl Into<String>, response: Option<Value>) -> Self {
        Self {
            status: TestStatus::Passed,
            message: message.into(),
            failure: None,
            response,
        }
    }

    /// A failing result.
    #[must_use]
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            message: message.into(),
            failure: Some(kind),
            response: None,
        }
    }

    /// Attach the decoded response body.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// Whether the test passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// A named entry in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    /// Test name.
    pub name: String,
    /// Its result.
    #[serde(flatten)]
    pub result: TestResult,
}

/// Pass/fail tally plus results in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    tests_run: usize,
    tests_passed: usize,
    results: Vec<TestRecord>,
}

impl RunSummary {
    /// Create an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one executed test and store its result.
    ///
    /// Recording a name twice replaces the earlier entry in place so every
    /// name has exactly one result.
    pub fn record(&mut self, name: impl Into<String>, result: TestResult) {
        let name = name.into();
        self.tests_run += 1;
        if result.is_passed() {
            self.tests_passed += 1;
        }

        match self.results.iter_mut().find(|record| record.name == name) {
            Some(existing) => existing.result = result,
            None => self.results.push(TestRecord { name, result }),
        }
    }

    /// Number of tests executed.
    #[must_use]
    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    /// Number of tests that passed.
    #[must_use]
    pub fn tests_passed(&self) -> usize {
        self.tests_passed
    }

    /// Results in the order they were first recorded.
    #[must_use]
    pub fn results(&self) -> &[TestRecord] {
        &self.results
    }

    /// Look up a result by test name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results
            .iter()
            .find(|record| record.name == name)
            .map(|record| &record.result)
    }

    /// Whether every executed test passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    /// Process exit code: 0 when all tests passed, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    /// Render the final report.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = format!(
            "\n📊 Tests passed: {}/{}\n",
            self.tests_passed, self.tests_run
        );
        for record in &self.results {
            let marker = if record.result.is_passed() { "✅" } else { "❌" };
            writeln!(&mut out, "{marker} {}", record.name).ok();
        }
        out
    }

    /// Print the final report to stdout.
    pub fn print_report(&self) {
        print!("{}", self.render());
    }

    /// Write the summary as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_counts_every_test() {
        let mut summary = RunSummary::new();
        summary.record("a", TestResult::passed("ok", None));
        summary.record("b", TestResult::failed(FailureKind::Transport, "refused"));

        assert_eq!(summary.tests_run(), 2);
        assert_eq!(summary.tests_passed(), 1);
        assert!(!summary.all_passed());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn empty_summary_exits_zero() {
        assert_eq!(RunSummary::new().exit_code(), 0);
    }

    #[test]
    fn rerecorded_name_keeps_position() {
        let mut summary = RunSummary::new();
        summary.record("first", TestResult::failed(FailureKind::Validation, "bad"));
        summary.record("second", TestResult::passed("ok", None));
        summary.record("first", TestResult::passed("ok now", None));

        let names: Vec<_> = summary.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(summary.get("first").unwrap().is_passed());
    }

    #[test]
    fn render_lists_results_in_order() {
        let mut summary = RunSummary::new();
        summary.record("Root API Endpoint", TestResult::passed("ok", None));
        summary.record(
            "GET Status Endpoint",
            TestResult::failed(FailureKind::StatusMismatch, "Expected 200, got 201"),
        );

        let report = summary.render();
        assert!(report.contains("Tests passed: 1/2"));
        let root = report.find("✅ Root API Endpoint").unwrap();
        let status = report.find("❌ GET Status Endpoint").unwrap();
        assert!(root < status);
    }

    #[test]
    fn json_report_is_flat_per_test() {
        let mut summary = RunSummary::new();
        summary.record(
            "Root API Endpoint",
            TestResult::passed("ok", Some(json!({"message": "Hello World"}))),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        summary.write_json(&path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["tests_run"], 1);
        assert_eq!(written["results"][0]["name"], "Root API Endpoint");
        assert_eq!(written["results"][0]["status"], "passed");
        assert_eq!(written["results"][0]["response"]["message"], "Hello World");
    }
}
