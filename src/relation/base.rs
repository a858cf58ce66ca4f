//! Base relations: constant reinsertion over a partition.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{Origin, Relation};
use crate::column::{project, recognizes, Column};
use crate::partition::Partition;
use crate::stats::DecodeStats;
use crate::types::{ColumnType, Signature};

impl Relation {
    /// Bind `partition` to its logical `signature`.
    ///
    /// Row count follows the partition when the signature has at least one
    /// physical position. A fully-constant relation has exactly one row.
    pub fn from_partition(
        id: impl Into<String>,
        partition: Arc<Partition>,
        signature: Signature,
        stats: Arc<DecodeStats>,
    ) -> Self {
        let row_count = if signature.physical_count() > 0 {
            partition.row_count()
        } else {
            1
        };
        Self {
            id: id.into(),
            origin: Origin::Base {
                partition,
                signature,
            },
            row_count,
            columns: OnceCell::new(),
            signature: OnceCell::new(),
            stats,
        }
    }
}

/// Resolve `signature` against the partition's fields. A physical position
/// whose field is missing or has no decoder resolves to Unknown, matching
/// the column [`project`] builds for it.
pub(super) fn resolve_signature(signature: &Signature, partition: &Partition) -> Vec<ColumnType> {
    let schema = partition.batch().schema();
    let mut fields = schema.fields().iter();
    signature
        .iter()
        .map(|d| {
            if d.is_constant() {
                return d.resolve();
            }
            match fields.next() {
                Some(field) if recognizes(field.data_type()) => d.resolve(),
                _ => ColumnType::Unknown,
            }
        })
        .collect()
}

pub(super) fn project_columns(
    id: &str,
    partition: &Partition,
    signature: &Signature,
    row_count: usize,
    stats: &Arc<DecodeStats>,
) -> Vec<Arc<Column>> {
    let physical = partition.columns();
    if physical.len() != signature.physical_count() {
        tracing::warn!(
            relation = id,
            expected = signature.physical_count(),
            actual = physical.len(),
            "Partition column count does not match signature"
        );
    }
    let columns = project(signature.descriptors(), physical, row_count, stats);
    stats.record_relation();
    tracing::debug!(
        relation = id,
        rows = row_count,
        columns = columns.len(),
        "Built base relation"
    );
    columns
}
