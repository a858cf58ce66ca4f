//! Row-wise concatenation of columns from several relations.

use std::sync::Arc;

use super::Column;
use crate::types::{ColumnType, Value};

/// Concatenation of constituent columns, in order, without copying.
///
/// Reports a single type token only when every constituent agrees;
/// otherwise [`ColumnType::Mixed`].
#[derive(Debug)]
pub struct UnionColumn {
    parts: Vec<Arc<Column>>,
    len: usize,
    column_type: ColumnType,
}

impl UnionColumn {
    pub fn new(parts: Vec<Arc<Column>>) -> Self {
        let len = parts.iter().map(|p| p.len()).sum();
        let mut types = parts.iter().map(|p| p.column_type());
        let column_type = match types.next() {
            Some(first) if types.all(|t| t == first) => first,
            Some(_) => ColumnType::Mixed,
            None => ColumnType::Null,
        };
        Self {
            parts,
            len,
            column_type,
        }
    }

    pub fn parts(&self) -> &[Arc<Column>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type.clone()
    }

    /// Translate a global row index into (constituent, local row).
    pub fn locate(&self, row: usize) -> Option<(usize, usize)> {
        let mut local = row;
        for (i, part) in self.parts.iter().enumerate() {
            if local < part.len() {
                return Some((i, local));
            }
            local -= part.len();
        }
        None
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        self.locate(row)
            .and_then(|(i, local)| self.parts[i].value(local))
            .unwrap_or(Value::Null)
    }

    pub(crate) fn string_at(&self, row: usize) -> String {
        self.locate(row)
            .and_then(|(i, local)| self.parts[i].string(local))
            .unwrap_or_default()
    }
}
