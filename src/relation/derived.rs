//! Derived relations: column slices and row-wise unions.

use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{Origin, Relation};
use crate::column::{Column, NullColumn, UnionColumn};
use crate::stats::DecodeStats;
use crate::types::ColumnType;

impl Relation {
    fn derived(
        id: String,
        columns: Vec<Arc<Column>>,
        signature: Option<Vec<ColumnType>>,
        row_count: usize,
        stats: Arc<DecodeStats>,
    ) -> Self {
        Self {
            id,
            origin: Origin::Derived,
            row_count,
            columns: OnceCell::with_value(columns),
            signature: signature.map_or_else(OnceCell::new, OnceCell::with_value),
            stats,
        }
    }

    /// View over a range of columns, sharing the column objects.
    ///
    /// The range is clamped to the relation's arity; an empty or inverted
    /// range yields a relation with no columns.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Relation {
        let arity = self.num_columns();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(arity);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => arity,
        }
        .clamp(start, arity);

        let columns = self.columns()[start..end].to_vec();
        let signature = self.signature()[start..end].to_vec();
        Relation::derived(
            self.id.clone(),
            columns,
            Some(signature),
            self.row_count,
            Arc::clone(&self.stats),
        )
    }

    /// Concatenate the rows of `relations`, in order.
    ///
    /// The result has the widest input's arity. An input lacking a column
    /// index contributes an all-null column of its own row count there.
    pub fn union(relations: &[Arc<Relation>]) -> Relation {
        let arity = relations.iter().map(|r| r.num_columns()).max().unwrap_or(0);
        let row_count = relations.iter().map(|r| r.row_count()).sum();

        let columns: Vec<Arc<Column>> = (0..arity)
            .map(|i| {
                let parts = relations
                    .iter()
                    .map(|r| {
                        r.column(i).unwrap_or_else(|| {
                            Arc::new(Column::Null(NullColumn::new(r.row_count())))
                        })
                    })
                    .collect();
                Arc::new(Column::Union(UnionColumn::new(parts)))
            })
            .collect();

        let stats = relations
            .first()
            .map_or_else(|| Arc::new(DecodeStats::new()), |r| Arc::clone(&r.stats));
        stats.record_union();
        tracing::debug!(
            inputs = relations.len(),
            rows = row_count,
            columns = arity,
            "Built union relation"
        );
        Relation::derived(union_id(relations), columns, None, row_count, stats)
    }
}

fn union_id(relations: &[Arc<Relation>]) -> String {
    match relations.split_first() {
        Some((first, rest)) if rest.iter().all(|r| r.id == first.id) => first.id.clone(),
        _ => relations
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
    }
}
