//! Photo Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared logging setup and error handling for the photo-ingest workspace.
//!
//! - **Logging**: `tracing` subscriber initialization driven by `LOG_*` env vars
//! - **Error Handling**: the shared [`PhotoError`] type
//!
//! # Example
//!
//! ```no_run
//! use photo_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{PhotoError, Result};
