//! BitSafe API client.
//!
//! This crate provides a small client for the BitSafe backend: a raw
//! request/response path used by the smoke harness, and typed calls for the
//! root and status-check endpoints.
//!
//! # Example
//!
//! ```no_run
//! use bitsafe_client::BitSafeClient;
//!
//! # async fn example() -> Result<(), bitsafe_client::ClientError> {
//! let client = BitSafeClient::new("http://localhost:8001")?;
//!
//! let created = client.create_status_check("docs_client").await?;
//! println!("Created status check {}", created.id);
//!
//! let checks = client.list_status_checks().await?;
//! println!("{} status checks stored", checks.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{BitSafeClient, ClientOptions};
pub use error::ClientError;
pub use types::*;
