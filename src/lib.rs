// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # rowlift
//!
//! Streaming CSV-to-relational ingest with batched transactional writes.
//!
//! rowlift reads a delimited text file line by line, reshapes each record
//! into a normalized row plus two JSON side-documents, persists rows in
//! transactional batches to an embedded relational store, and serves a
//! read-side age-distribution query.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rowlift::{ingest_file, AgeDistribution, Store};
//!
//! fn main() -> rowlift::Result<()> {
//!     let store = Store::in_memory()?;
//!
//!     // Stream the file through parse → normalize → batched writes
//!     let report = ingest_file("people.csv", &store, 1000, |rows| {
//!         eprintln!("{rows} rows written");
//!     })?;
//!
//!     // Read side: bucketed age distribution
//!     let distribution = AgeDistribution::from_counts(store.age_counts()?);
//!     println!("{} rows, {:?}", report.rows_processed, distribution);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! source file ──lines──▶ parse ──fields──▶ record ──rows──▶ batch ──▶ store
//!                          │                                  │        │
//!                   quoting rules                    threshold +      one
//!                   (line parser)                    final flush   transaction
//!                                                                  per batch
//!                                              store ──(age, count)──▶ aggregate
//! ```
//!
//! The stream driver reads strictly sequentially: the next line is not
//! consumed until the current line's processing, including any triggered
//! batch write, has completed.

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Line parser (CSV quoting rules)
pub mod parse;

/// Record builder (nested tree, normalized row)
pub mod record;

/// Batch accumulator over a sink trait
pub mod batch;

/// Stream driver
pub mod stream;

/// DuckDB-backed store
pub mod store;

/// Age distribution buckets
pub mod aggregate;

/// Configuration surface
pub mod config;

/// HTTP trigger surface
pub mod server;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use aggregate::{AgeDistribution, BucketStat};
pub use batch::{Accumulator, BatchSink};
pub use config::{AppConfig, DatabaseConfig};
pub use error::{Error, Result};
pub use record::NormalizedRow;
pub use store::Store;
pub use stream::{ingest_file, ingest_reader, IngestReport};
