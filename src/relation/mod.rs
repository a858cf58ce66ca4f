//! Relations: logical views over partitions.
//!
//! A base relation pairs a [`Partition`] with a [`Signature`] and reinserts
//! lifted constants at projection time. Derived relations (slices and
//! unions) only hold references to columns that already exist.

mod base;
mod derived;
pub mod collection;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::column::{Column, Tabular};
use crate::partition::Partition;
use crate::stats::DecodeStats;
use crate::types::{ColumnType, Signature, Value};

pub use collection::{RelationCollection, Term};

#[derive(Debug)]
enum Origin {
    Base {
        partition: Arc<Partition>,
        signature: Signature,
    },
    Derived,
}

/// Logical view over physical data.
///
/// The column list and the resolved signature are computed once and cached;
/// later reads are read-only and safe to share across threads.
#[derive(Debug)]
pub struct Relation {
    id: String,
    origin: Origin,
    row_count: usize,
    columns: OnceCell<Vec<Arc<Column>>>,
    signature: OnceCell<Vec<ColumnType>>,
    stats: Arc<DecodeStats>,
}

impl Relation {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Logical signature the relation was built from. Derived relations
    /// have none.
    pub fn descriptors(&self) -> Option<&Signature> {
        match &self.origin {
            Origin::Base { signature, .. } => Some(signature),
            Origin::Derived => None,
        }
    }

    pub fn partition(&self) -> Option<&Arc<Partition>> {
        match &self.origin {
            Origin::Base { partition, .. } => Some(partition),
            Origin::Derived => None,
        }
    }

    /// All logical columns, constants included.
    pub fn columns(&self) -> &[Arc<Column>] {
        self.columns.get_or_init(|| self.build_columns())
    }

    pub fn column(&self, index: usize) -> Option<Arc<Column>> {
        self.columns().get(index).cloned()
    }

    pub fn num_columns(&self) -> usize {
        match &self.origin {
            Origin::Base { signature, .. } => signature.len(),
            Origin::Derived => self.columns().len(),
        }
    }

    /// Resolved type token of every logical column.
    pub fn signature(&self) -> &[ColumnType] {
        self.signature.get_or_init(|| match &self.origin {
            Origin::Base {
                partition,
                signature,
            } => base::resolve_signature(signature, partition),
            Origin::Derived => self.columns().iter().map(|c| c.column_type()).collect(),
        })
    }

    pub fn value(&self, column: usize, row: usize) -> Option<Value> {
        self.column(column)?.value(row)
    }

    pub fn string(&self, column: usize, row: usize) -> Option<String> {
        self.column(column)?.string(row)
    }

    /// Iterate materialized rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.row_count).filter_map(move |r| self.row(r))
    }

    fn build_columns(&self) -> Vec<Arc<Column>> {
        match &self.origin {
            Origin::Base {
                partition,
                signature,
            } => base::project_columns(&self.id, partition, signature, self.row_count, &self.stats),
            // derived relations are built with their columns in place
            Origin::Derived => Vec::new(),
        }
    }
}

impl Tabular for Relation {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn num_columns(&self) -> usize {
        Relation::num_columns(self)
    }

    fn column_at(&self, index: usize) -> Option<Arc<Column>> {
        self.column(index)
    }

    fn column_types(&self) -> Vec<ColumnType> {
        self.signature().to_vec()
    }
}

/// Text table: id, resolved signature as a path, then one line per row.
impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.id)?;
        for t in self.signature() {
            write!(f, "/{}", t)?;
        }
        writeln!(f)?;
        let columns = self.columns();
        for row in 0..self.row_count {
            for (i, c) in columns.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&c.string(row).unwrap_or_default())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
