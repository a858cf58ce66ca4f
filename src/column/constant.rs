//! Synthesized columns with no physical storage.

use super::scalar::TemporalUnit;
use crate::types::{ColumnType, Value};

/// One logical value repeated `len` times (a lifted constant).
///
/// A lifted date or timestamp keeps its unit so it renders exactly like
/// the physical [`TemporalColumn`](super::TemporalColumn) it replaces.
#[derive(Debug)]
pub struct LiteralColumn {
    value: Value,
    column_type: ColumnType,
    len: usize,
    temporal: Option<TemporalUnit>,
}

impl LiteralColumn {
    pub fn new(value: Value, column_type: ColumnType, len: usize) -> Self {
        Self {
            value,
            column_type,
            len,
            temporal: None,
        }
    }

    pub fn with_temporal(mut self, unit: TemporalUnit) -> Self {
        self.temporal = Some(unit);
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type.clone()
    }

    pub(crate) fn value_at(&self, _row: usize) -> Value {
        self.value.clone()
    }

    pub(crate) fn string_at(&self, _row: usize) -> String {
        match (&self.value, self.temporal) {
            (Value::Instant(t), Some(unit)) => unit.format(t),
            (value, _) => value.to_string(),
        }
    }
}

/// The builtin "missing" sentinel in every row.
#[derive(Debug)]
pub struct MissingColumn {
    len: usize,
}

impl MissingColumn {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Missing
    }

    pub(crate) fn value_at(&self, _row: usize) -> Value {
        Value::Missing
    }
}

/// All-null padding used by union relations.
#[derive(Debug)]
pub struct NullColumn {
    len: usize,
}

impl NullColumn {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Null
    }

    pub(crate) fn value_at(&self, _row: usize) -> Value {
        Value::Null
    }
}

/// Stand-in for data the decoder does not understand.
#[derive(Debug)]
pub struct UnknownColumn {
    len: usize,
}

impl UnknownColumn {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Unknown
    }

    pub(crate) fn value_at(&self, _row: usize) -> Value {
        Value::Unknown
    }
}
