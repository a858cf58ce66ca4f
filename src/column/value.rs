//! Generic (user-defined) value-type columns.

use std::sync::Arc;

use super::{project, Column, StructColumn, Tabular};
use crate::stats::DecodeStats;
use crate::types::{ColumnType, Descriptor, Value};

/// A value type whose members are a mix of lifted constants and physical
/// sub-columns. Each row reads as a tuple of all members, in order.
#[derive(Debug)]
pub struct ValueColumn {
    members: Vec<Arc<Column>>,
    len: usize,
}

impl ValueColumn {
    /// Decode `members` against the physical column backing the value.
    ///
    /// A value with several physical members is a struct whose fields map
    /// to those members in order; a value with one physical member may also
    /// arrive as that member's bare column.
    pub fn decode(members: &[Descriptor], physical: Arc<Column>, stats: &Arc<DecodeStats>) -> Self {
        let len = physical.len();
        let wanted = members.iter().filter(|m| !m.is_constant()).count();
        let children: Vec<Arc<Column>> = match physical.as_ref() {
            Column::Struct(s) if unwraps(s, wanted) => s.children().to_vec(),
            _ => vec![physical],
        };
        Self {
            members: project(members, &children, len, stats),
            len,
        }
    }

    pub fn members(&self) -> &[Arc<Column>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Value(self.members.iter().map(|m| m.column_type()).collect())
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        Value::Tuple(
            self.members
                .iter()
                .map(|m| m.value(row).unwrap_or(Value::Unknown))
                .collect(),
        )
    }
}

fn unwraps(s: &StructColumn, wanted: usize) -> bool {
    wanted != 1 || s.children().len() == 1
}

impl Tabular for ValueColumn {
    fn row_count(&self) -> usize {
        self.len
    }

    fn num_columns(&self) -> usize {
        self.members.len()
    }

    fn column_at(&self, index: usize) -> Option<Arc<Column>> {
        self.members.get(index).cloned()
    }
}
