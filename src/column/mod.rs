//! Column abstraction and decoders.
//!
//! A [`Column`] is a read-only, positionally indexed view. The variants form
//! a closed set: physical views over Arrow arrays (`Primitive`, `List`,
//! `Struct`), logical decoders layered over a physical column (`Char`,
//! `WideInt`, `Decimal`, `Rational`, `Temporal`, `Tagged`, `Value`),
//! synthesized columns with no physical storage (`Literal`, `Missing`,
//! `Null`, `Unknown`), and the concatenating `Union` view.
//!
//! Row access never panics: an index past the end yields `None`.

pub mod physical;
pub mod scalar;
pub mod constant;
pub mod value;
pub mod union;
pub mod decode;

use std::sync::Arc;

use crate::types::{ColumnType, Value};

pub use constant::{LiteralColumn, MissingColumn, NullColumn, UnknownColumn};
pub use decode::{constant_column, decode_column, project};
pub use physical::{from_array, recognizes, ListColumn, PrimitiveColumn, StructColumn};
pub use scalar::{
    CharColumn, DecimalColumn, RationalColumn, TaggedColumn, TemporalColumn, TemporalUnit,
    WideIntColumn,
};
pub use union::UnionColumn;
pub use value::ValueColumn;

/// Read-only typed column.
#[derive(Debug)]
pub enum Column {
    Primitive(PrimitiveColumn),
    List(ListColumn),
    Struct(StructColumn),
    Char(CharColumn),
    WideInt(WideIntColumn),
    Decimal(DecimalColumn),
    Rational(RationalColumn),
    Temporal(TemporalColumn),
    Tagged(TaggedColumn),
    Value(ValueColumn),
    Literal(LiteralColumn),
    Missing(MissingColumn),
    Null(NullColumn),
    Unknown(UnknownColumn),
    Union(UnionColumn),
}

macro_rules! dispatch {
    ($column:expr, $c:ident => $body:expr) => {
        match $column {
            Column::Primitive($c) => $body,
            Column::List($c) => $body,
            Column::Struct($c) => $body,
            Column::Char($c) => $body,
            Column::WideInt($c) => $body,
            Column::Decimal($c) => $body,
            Column::Rational($c) => $body,
            Column::Temporal($c) => $body,
            Column::Tagged($c) => $body,
            Column::Value($c) => $body,
            Column::Literal($c) => $body,
            Column::Missing($c) => $body,
            Column::Null($c) => $body,
            Column::Unknown($c) => $body,
            Column::Union($c) => $body,
        }
    };
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        dispatch!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded value at `row`, or `None` past the end.
    pub fn value(&self, row: usize) -> Option<Value> {
        (row < self.len()).then(|| self.value_at(row))
    }

    /// Display string at `row`, or `None` past the end.
    pub fn string(&self, row: usize) -> Option<String> {
        if row >= self.len() {
            return None;
        }
        let s = match self {
            Column::Temporal(c) => c.string_at(row),
            Column::Literal(c) => c.string_at(row),
            Column::Union(c) => c.string_at(row),
            other => other.value_at(row).to_string(),
        };
        Some(s)
    }

    /// Logical type token of this column.
    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, c => c.column_type())
    }

    /// Sub-column access for columns that are themselves tabular.
    pub fn as_tabular(&self) -> Option<&dyn Tabular> {
        match self {
            Column::List(c) => Some(c),
            Column::Struct(c) => Some(c),
            Column::Value(c) => Some(c),
            _ => None,
        }
    }

    /// Iterate every value in row order.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |row| self.value_at(row))
    }

    // ── Physical helpers for decoders layered on top ───────────────

    /// `row` must be in bounds.
    pub(crate) fn value_at(&self, row: usize) -> Value {
        dispatch!(self, c => c.value_at(row))
    }

    pub(crate) fn is_null_at(&self, row: usize) -> bool {
        match self {
            Column::Primitive(c) => c.is_null_at(row),
            Column::List(c) => c.is_null_at(row),
            Column::Struct(c) => c.is_null_at(row),
            other => other.value_at(row).is_null(),
        }
    }

    /// Integer reading of `row`. Two-word lists are combined into a signed
    /// 128-bit integer.
    pub(crate) fn integer_at(&self, row: usize) -> Option<i128> {
        match self {
            Column::List(c) => c.int128_at(row),
            other => other.value_at(row).as_i128(),
        }
    }
}

// ── Tabular ────────────────────────────────────────────────────────

/// Capability of anything that exposes positional sub-columns: partitions,
/// relations, and composite columns (fixed-size lists, nested structs,
/// value types).
pub trait Tabular {
    fn row_count(&self) -> usize;

    fn num_columns(&self) -> usize;

    fn column_at(&self, index: usize) -> Option<Arc<Column>>;

    /// Type token of every sub-column, aligned with column indices.
    fn column_types(&self) -> Vec<ColumnType> {
        (0..self.num_columns())
            .map(|i| {
                self.column_at(i)
                    .map_or(ColumnType::Unknown, |c| c.column_type())
            })
            .collect()
    }

    /// Materialize one full row, or `None` past the end.
    fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.row_count() {
            return None;
        }
        (0..self.num_columns())
            .map(|i| self.column_at(i).and_then(|c| c.value(index)))
            .collect()
    }
}
