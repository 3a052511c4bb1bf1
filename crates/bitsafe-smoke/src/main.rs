//! BitSafe smoke test runner.
//!
//! Runs the fixed smoke test sequence against a BitSafe deployment and exits
//! with status 0 only when every test passed.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitsafe_smoke::{suite, Harness, HarnessConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,bitsafe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HarnessConfig::from_env();

    tracing::info!(
        base_url = %config.base_url,
        timeout_seconds = config.timeout_seconds,
        settle_delay_ms = config.settle_delay_ms,
        report_path = ?config.report_path,
        "Harness configuration loaded"
    );

    let mut harness = match Harness::new(&config) {
        Ok(harness) => harness,
        Err(err) => {
            tracing::error!(error = %err, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    println!("Testing BitSafe API at {}", config.base_url);
    suite::run_all(&mut harness).await;

    let summary = harness.into_summary();
    summary.print_report();

    if let Some(path) = &config.report_path {
        match summary.write_json(path) {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote run report"),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "Failed to write run report"),
        }
    }

    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
