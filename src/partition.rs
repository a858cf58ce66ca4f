//! Partition: one physical columnar chunk of a transaction result.
//!
//! Wraps an Arrow `RecordBatch`. Columns are derived on first access, one
//! per physical field in field order, and cached for the life of the
//! partition.

use std::io::Cursor;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::datatypes::Schema;
use arrow::ipc::reader::StreamReader;
use arrow::record_batch::RecordBatch;
use once_cell::sync::OnceCell;
use rayon::prelude::*;

use crate::column::{from_array, Column, Tabular};
use crate::config::ProjectionConfig;
use crate::error::Result;
use crate::stats::DecodeStats;
use crate::types::ColumnType;

/// Immutable physical chunk with lazily decoded columns.
#[derive(Debug)]
pub struct Partition {
    batch: RecordBatch,
    columns: OnceCell<Vec<Arc<Column>>>,
    stats: Arc<DecodeStats>,
    config: ProjectionConfig,
}

impl Partition {
    pub fn new(batch: RecordBatch) -> Self {
        Self {
            batch,
            columns: OnceCell::new(),
            stats: Arc::new(DecodeStats::new()),
            config: ProjectionConfig::default(),
        }
    }

    /// Partition with no fields. Backs fully-constant relations that arrive
    /// without physical data, and reports a single empty row.
    pub fn empty() -> Self {
        Self::new(RecordBatch::new_empty(Arc::new(Schema::empty())))
    }

    /// Decode an Arrow IPC stream. Multiple record batches are concatenated
    /// into one partition.
    pub fn from_ipc(bytes: &[u8]) -> Result<Self> {
        let reader = StreamReader::try_new(Cursor::new(bytes), None)?;
        let schema = reader.schema();
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        let batch = concat_batches(&schema, &batches)?;
        tracing::debug!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "Read partition from IPC stream"
        );
        Ok(Self::new(batch))
    }

    /// Share decode counters with the owning transaction result.
    pub fn with_stats(mut self, stats: Arc<DecodeStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_config(mut self, config: &ProjectionConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Physical rows, or 1 when the chunk has no physical columns.
    pub fn row_count(&self) -> usize {
        if self.batch.num_columns() == 0 {
            return 1;
        }
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Decoded columns in field order.
    pub fn columns(&self) -> &[Arc<Column>] {
        self.columns.get_or_init(|| self.derive_columns())
    }

    pub fn column(&self, index: usize) -> Option<Arc<Column>> {
        self.columns().get(index).cloned()
    }

    /// Type token of each physical field, independent of any relation the
    /// partition backs.
    pub fn physical_signature(&self) -> Vec<ColumnType> {
        self.column_types()
    }

    fn derive_columns(&self) -> Vec<Arc<Column>> {
        let arrays = self.batch.columns();
        let parallel = self.config.decodes_in_parallel(arrays.len());
        let columns: Vec<Arc<Column>> = if parallel {
            arrays
                .par_iter()
                .map(|a| Arc::new(from_array(Arc::clone(a), &self.stats)))
                .collect()
        } else {
            arrays
                .iter()
                .map(|a| Arc::new(from_array(Arc::clone(a), &self.stats)))
                .collect()
        };
        self.stats.record_partition(columns.len());
        tracing::debug!(
            rows = self.row_count(),
            columns = columns.len(),
            parallel,
            "Decoded partition columns"
        );
        columns
    }
}

impl Tabular for Partition {
    fn row_count(&self) -> usize {
        Partition::row_count(self)
    }

    fn num_columns(&self) -> usize {
        Partition::num_columns(self)
    }

    fn column_at(&self, index: usize) -> Option<Arc<Column>> {
        self.column(index)
    }
}
