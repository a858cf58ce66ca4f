//! Physical columns over Arrow arrays, and the dispatch that picks one.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, FixedSizeListArray, Float16Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray,
    StringArray, StructArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::compute::take;
use arrow::datatypes::DataType;
use once_cell::sync::OnceCell;

use super::{Column, Tabular, UnknownColumn};
use crate::stats::DecodeStats;
use crate::types::value::int128_from_words;
use crate::types::{ColumnType, PrimitiveType, Value};

/// Pick the physical column variant for an Arrow array.
///
/// Arrays of a type the decoder does not understand become an
/// [`UnknownColumn`] of the same length; decoding never aborts.
pub fn from_array(array: ArrayRef, stats: &Arc<DecodeStats>) -> Column {
    if let Some(kind) = PrimitiveType::from_arrow(array.data_type()) {
        return Column::Primitive(PrimitiveColumn::new(array, kind));
    }

    match array.data_type() {
        DataType::FixedSizeList(_, _) => {
            if let Some(list) = array.as_any().downcast_ref::<FixedSizeListArray>() {
                return Column::List(ListColumn::new(list.clone(), stats));
            }
        }
        DataType::Struct(_) => {
            if let Some(s) = array.as_any().downcast_ref::<StructArray>() {
                return Column::Struct(StructColumn::new(s, stats));
            }
        }
        _ => {}
    }

    tracing::warn!(
        data_type = %array.data_type(),
        len = array.len(),
        "Unrecognized physical type, decoding as unknown"
    );
    stats.record_unknown();
    Column::Unknown(UnknownColumn::new(array.len()))
}

/// Whether [`from_array`] has a decoder for arrays of `data_type`.
pub fn recognizes(data_type: &DataType) -> bool {
    PrimitiveType::from_arrow(data_type).is_some()
        || matches!(data_type, DataType::FixedSizeList(_, _) | DataType::Struct(_))
}

fn downcast<T: 'static>(array: &dyn Array) -> Option<&T> {
    array.as_any().downcast_ref::<T>()
}

// ── PrimitiveColumn ────────────────────────────────────────────────

/// Bool, fixed-width numeric, or string array.
#[derive(Debug)]
pub struct PrimitiveColumn {
    array: ArrayRef,
    kind: PrimitiveType,
}

impl PrimitiveColumn {
    pub fn new(array: ArrayRef, kind: PrimitiveType) -> Self {
        Self { array, kind }
    }

    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Primitive(self.kind)
    }

    pub(crate) fn is_null_at(&self, row: usize) -> bool {
        self.array.is_null(row)
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        let a = self.array.as_ref();
        if a.is_null(row) {
            return Value::Null;
        }
        let value = match self.kind {
            PrimitiveType::Bool => downcast::<BooleanArray>(a).map(|x| Value::Bool(x.value(row))),
            PrimitiveType::Int8 => downcast::<Int8Array>(a).map(|x| Value::Int(x.value(row) as i64)),
            PrimitiveType::Int16 => downcast::<Int16Array>(a).map(|x| Value::Int(x.value(row) as i64)),
            PrimitiveType::Int32 => downcast::<Int32Array>(a).map(|x| Value::Int(x.value(row) as i64)),
            PrimitiveType::Int64 => downcast::<Int64Array>(a).map(|x| Value::Int(x.value(row))),
            PrimitiveType::UInt8 => downcast::<UInt8Array>(a).map(|x| Value::UInt(x.value(row) as u64)),
            PrimitiveType::UInt16 => downcast::<UInt16Array>(a).map(|x| Value::UInt(x.value(row) as u64)),
            PrimitiveType::UInt32 => downcast::<UInt32Array>(a).map(|x| Value::UInt(x.value(row) as u64)),
            PrimitiveType::UInt64 => downcast::<UInt64Array>(a).map(|x| Value::UInt(x.value(row))),
            PrimitiveType::Float16 => {
                downcast::<Float16Array>(a).map(|x| Value::Float(x.value(row).to_f64()))
            }
            PrimitiveType::Float32 => {
                downcast::<Float32Array>(a).map(|x| Value::Float(x.value(row) as f64))
            }
            PrimitiveType::Float64 => downcast::<Float64Array>(a).map(|x| Value::Float(x.value(row))),
            PrimitiveType::String => downcast::<StringArray>(a)
                .map(|x| x.value(row).to_string())
                .or_else(|| downcast::<LargeStringArray>(a).map(|x| x.value(row).to_string()))
                .map(Value::String),
            // no single-array physical form
            PrimitiveType::Int128 | PrimitiveType::UInt128 | PrimitiveType::Char => None,
        };
        value.unwrap_or(Value::Unknown)
    }
}

// ── ListColumn ─────────────────────────────────────────────────────

/// Fixed-size list of primitives; carries multi-word scalars such as
/// 128-bit integers (2 words) and 128-bit rationals (4 words).
#[derive(Debug)]
pub struct ListColumn {
    array: FixedSizeListArray,
    width: usize,
    items: Arc<Column>,
    elements: OnceCell<Vec<Arc<Column>>>,
    stats: Arc<DecodeStats>,
}

impl ListColumn {
    pub fn new(array: FixedSizeListArray, stats: &Arc<DecodeStats>) -> Self {
        let width = usize::try_from(array.value_length()).unwrap_or(0);
        let items = Arc::new(from_array(array.values().clone(), stats));
        Self {
            array,
            width,
            items,
            elements: OnceCell::new(),
            stats: Arc::clone(stats),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::List(Box::new(self.items.column_type()), self.width)
    }

    pub(crate) fn is_null_at(&self, row: usize) -> bool {
        self.array.is_null(row)
    }

    fn item_index(&self, row: usize, j: usize) -> usize {
        usize::try_from(self.array.value_offset(row)).unwrap_or(0) + j
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.array.is_null(row) {
            return Value::Null;
        }
        Value::Tuple(
            (0..self.width)
                .map(|j| self.items.value(self.item_index(row, j)).unwrap_or(Value::Unknown))
                .collect(),
        )
    }

    /// Integer reading of item `j` of `row`.
    pub(crate) fn item_integer(&self, row: usize, j: usize) -> Option<i128> {
        if j >= self.width {
            return None;
        }
        self.items.value(self.item_index(row, j))?.as_i128()
    }

    /// Raw 64-bit words of `row`, in storage order.
    pub(crate) fn words_at(&self, row: usize) -> Option<Vec<u64>> {
        (0..self.width)
            .map(|j| match self.items.value(self.item_index(row, j))? {
                Value::Int(v) => Some(v as u64),
                Value::UInt(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Signed 128-bit reading of a (low, high) two-word row.
    pub(crate) fn int128_at(&self, row: usize) -> Option<i128> {
        match self.words_at(row)?.as_slice() {
            [low, high] => Some(int128_from_words(*low, *high)),
            _ => None,
        }
    }

    fn elements(&self) -> &[Arc<Column>] {
        self.elements.get_or_init(|| {
            (0..self.width)
                .map(|j| {
                    // u64 indices: a usize item index always fits
                    let indices = UInt64Array::from_iter_values(
                        (0..self.len()).map(|row| self.item_index(row, j) as u64),
                    );
                    match take(self.array.values().as_ref(), &indices, None) {
                        Ok(array) => Arc::new(from_array(array, &self.stats)),
                        Err(e) => {
                            tracing::warn!(error = %e, "List element gather failed");
                            self.stats.record_unknown();
                            Arc::new(Column::Unknown(UnknownColumn::new(self.len())))
                        }
                    }
                })
                .collect()
        })
    }
}

impl Tabular for ListColumn {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn num_columns(&self) -> usize {
        self.width
    }

    fn column_at(&self, index: usize) -> Option<Arc<Column>> {
        self.elements().get(index).cloned()
    }
}

// ── StructColumn ───────────────────────────────────────────────────

/// Nested field-list; one child column per field.
#[derive(Debug)]
pub struct StructColumn {
    array: StructArray,
    children: Vec<Arc<Column>>,
}

impl StructColumn {
    pub fn new(array: &StructArray, stats: &Arc<DecodeStats>) -> Self {
        let children = array
            .columns()
            .iter()
            .map(|child| Arc::new(from_array(Arc::clone(child), stats)))
            .collect();
        Self {
            array: array.clone(),
            children,
        }
    }

    pub fn children(&self) -> &[Arc<Column>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Struct(self.children.iter().map(|c| c.column_type()).collect())
    }

    pub(crate) fn is_null_at(&self, row: usize) -> bool {
        self.array.is_null(row)
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.array.is_null(row) {
            return Value::Null;
        }
        Value::Tuple(
            self.children
                .iter()
                .map(|c| c.value(row).unwrap_or(Value::Unknown))
                .collect(),
        )
    }
}

impl Tabular for StructColumn {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn num_columns(&self) -> usize {
        self.children.len()
    }

    fn column_at(&self, index: usize) -> Option<Arc<Column>> {
        self.children.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BinaryArray, Int64Builder, FixedSizeListBuilder};
    use arrow::datatypes::{Field, Fields};

    fn stats() -> Arc<DecodeStats> {
        Arc::new(DecodeStats::new())
    }

    fn words_list(rows: &[[i64; 2]]) -> FixedSizeListArray {
        let mut builder = FixedSizeListBuilder::new(Int64Builder::new(), 2);
        for row in rows {
            builder.values().append_value(row[0]);
            builder.values().append_value(row[1]);
            builder.append(true);
        }
        builder.finish()
    }

    #[test]
    fn test_primitive_values() {
        let col = from_array(Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])), &stats());
        assert_eq!(col.len(), 3);
        assert_eq!(col.value(0), Some(Value::Int(1)));
        assert_eq!(col.value(1), Some(Value::Null));
        assert_eq!(col.value(3), None);
        assert_eq!(col.column_type(), ColumnType::Primitive(PrimitiveType::Int64));
    }

    #[test]
    fn test_string_and_bool() {
        let s = from_array(Arc::new(StringArray::from(vec!["a", "b"])), &stats());
        assert_eq!(s.string(1), Some("b".to_string()));
        let b = from_array(Arc::new(BooleanArray::from(vec![true, false])), &stats());
        assert_eq!(b.value(1), Some(Value::Bool(false)));
    }

    #[test]
    fn test_unknown_physical_type() {
        let stats = stats();
        let col = from_array(
            Arc::new(BinaryArray::from_vec(vec![b"x".as_ref(), b"y".as_ref()])),
            &stats,
        );
        assert_eq!(col.len(), 2);
        assert_eq!(col.value(0), Some(Value::Unknown));
        assert_eq!(col.string(1), Some("unknown".to_string()));
        assert_eq!(col.column_type(), ColumnType::Unknown);
        assert_eq!(stats.snapshot().unknown_fallbacks, 1);
    }

    #[test]
    fn test_list_column_words_and_elements() {
        let col = from_array(Arc::new(words_list(&[[5, 0], [-1, -1]])), &stats());
        assert_eq!(col.integer_at(0), Some(5));
        assert_eq!(col.integer_at(1), Some(-1));
        assert_eq!(
            col.value(0),
            Some(Value::Tuple(vec![Value::Int(5), Value::Int(0)]))
        );

        let tab = col.as_tabular().unwrap();
        assert_eq!(tab.num_columns(), 2);
        let low = tab.column_at(0).unwrap();
        assert_eq!(low.value(1), Some(Value::Int(-1)));
        assert_eq!(tab.row(0), Some(vec![Value::Int(5), Value::Int(0)]));
        assert_eq!(tab.row(2), None);
    }

    #[test]
    fn test_list_elements_after_slice() {
        let list = words_list(&[[1, 10], [2, 20], [3, 30]]).slice(1, 2);
        let col = from_array(Arc::new(list), &stats());
        let tab = col.as_tabular().unwrap();
        let high = tab.column_at(1).unwrap();
        assert_eq!(high.len(), 2);
        assert_eq!(high.value(0), Some(Value::Int(20)));
        assert_eq!(high.value(1), Some(Value::Int(30)));
        assert_eq!(tab.row(1), Some(vec![Value::Int(3), Value::Int(30)]));
    }

    #[test]
    fn test_struct_column() {
        let a: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        let b: ArrayRef = Arc::new(StringArray::from(vec!["x", "y"]));
        let fields = Fields::from(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("b", DataType::Utf8, false),
        ]);
        let s = StructArray::new(fields, vec![a, b], None);
        let col = from_array(Arc::new(s), &stats());

        assert_eq!(
            col.value(1),
            Some(Value::Tuple(vec![Value::Int(2), Value::String("y".into())]))
        );
        let tab = col.as_tabular().unwrap();
        assert_eq!(
            tab.column_types(),
            vec![
                ColumnType::Primitive(PrimitiveType::Int64),
                ColumnType::Primitive(PrimitiveType::String)
            ]
        );
    }
}
