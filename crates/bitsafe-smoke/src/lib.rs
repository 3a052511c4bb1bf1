//! BitSafe smoke-test harness.
//!
//! Runs a fixed, strictly sequential list of HTTP checks against a BitSafe
//! deployment and reports how many passed.
//!
//! # Example
//!
//! ```no_run
//! use bitsafe_smoke::{suite, Harness, HarnessConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarnessConfig::from_env();
//! let mut harness = Harness::new(&config)?;
//!
//! suite::run_all(&mut harness).await;
//!
//! let summary = harness.into_summary();
//! summary.print_report();
//! std::process::exit(summary.exit_code());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod harness;
pub mod report;
pub mod suite;

pub use config::HarnessConfig;
pub use error::ConfigError;
pub use harness::{Harness, TestCase, Validator};
pub use report::{FailureKind, RunSummary, TestRecord, TestResult, TestStatus};
