//! relview: typed relation views over transaction results.
//!
//! A transaction result arrives as three pieces: metadata (one logical
//! [`Signature`] per relation id), one Arrow partition per relation id,
//! and a list of problems. Values that are identical in every row are
//! lifted out of the physical data into the signature; this crate puts
//! them back, decodes builtin value types (dates, decimals, rationals,
//! 128-bit integers, ...), and exposes each relation as a positional,
//! typed, read-only table.
//!
//! ```no_run
//! use relview::{MetadataFormat, PrefetchedSource, TransactionResult};
//!
//! # fn run(metadata: Vec<u8>, ipc: Vec<u8>) -> relview::Result<()> {
//! let source = PrefetchedSource::new(metadata, MetadataFormat::Json)
//!     .with_partition("/:output/Int64", ipc);
//! let mut txn = TransactionResult::new("txn-1", source);
//! for relation in &txn.select(&["output", "_"])? {
//!     println!("{}", relation);
//! }
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod partition;
pub mod problems;
pub mod relation;
pub mod stats;
pub mod transaction;
pub mod types;

pub use column::{Column, Tabular};
pub use config::ProjectionConfig;
pub use error::{Result, ResultError};
pub use metadata::Metadata;
pub use partition::Partition;
pub use problems::Problem;
pub use relation::{Relation, RelationCollection, Term};
pub use stats::{DecodeStats, StatsSnapshot};
pub use transaction::{MetadataFormat, PrefetchedSource, ResultSource, TransactionResult};
pub use types::{ColumnType, Descriptor, Signature, Value};
