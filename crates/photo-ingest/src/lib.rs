//! Photo Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Downloads the images listed in a CSV file, stores each one with a JSON
//! sidecar of its source row, and writes a manifest of what succeeded.
//!
//! # Layout
//!
//! ```text
//! downloads/
//!   manifest.json
//!   <author>/<year>/<slug>_by_<author>_<id>.jpg
//!   <author>/<year>/<slug>_by_<author>_<id>.json
//! ```
//!
//! # Pipeline
//!
//! - [`source`]: CSV rows into [`Record`]s
//! - [`path`]: where a record is stored
//! - [`transfer`]: fetch + write one record
//! - [`scheduler`]: groups of concurrent transfers with a barrier between groups
//! - [`manifest`]: the final index of successes
//! - [`pipeline`]: wires the above together
//!
//! # Example
//!
//! ```no_run
//! use photo_ingest::{pipeline, IngestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::builder()
//!         .root("./data")
//!         .input("photos.csv")
//!         .group_size(20)
//!         .build();
//!     let summary = pipeline::run(&config).await?;
//!     println!("{} of {} stored", summary.succeeded, summary.processed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod path;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod scheduler;
pub mod source;
pub mod transfer;

pub use config::IngestConfig;
pub use error::{IngestError, ManifestError, TransferError};
pub use manifest::{Manifest, ManifestEntry};
pub use path::{build_path, StoragePath};
pub use pipeline::RunSummary;
pub use record::Record;
pub use scheduler::BatchScheduler;
pub use transfer::{Fetcher, HttpFetcher, TransferOutcome, TransferUnit};
