//! Logical decode: pair descriptors with physical columns.
//!
//! `project` is the constant-reinsertion walk shared by base relations and
//! value-type columns: constant positions become synthesized columns,
//! every other position consumes the next physical column and is decoded
//! according to its descriptor.

use std::sync::Arc;

use super::scalar::TemporalUnit;
use super::{
    CharColumn, Column, DecimalColumn, LiteralColumn, MissingColumn, RationalColumn,
    TaggedColumn, TemporalColumn, UnknownColumn, ValueColumn, WideIntColumn,
};
use crate::stats::DecodeStats;
use crate::types::{BuiltinType, Descriptor, PrimitiveType};

/// Walk `descriptors` left to right, consuming `physical` columns in order.
///
/// Constant positions are synthesized with `row_count` rows. Positions
/// left without a physical column become Unknown columns.
pub fn project(
    descriptors: &[Descriptor],
    physical: &[Arc<Column>],
    row_count: usize,
    stats: &Arc<DecodeStats>,
) -> Vec<Arc<Column>> {
    let mut next = physical.iter();
    let columns: Vec<Arc<Column>> = descriptors
        .iter()
        .map(|d| {
            if d.is_constant() {
                return constant_column(d, row_count, stats);
            }
            match next.next() {
                Some(col) => decode_column(d, Arc::clone(col), stats),
                None => {
                    tracing::warn!(
                        descriptor = %d,
                        "No physical column left for descriptor, decoding as unknown"
                    );
                    stats.record_unknown();
                    Arc::new(Column::Unknown(UnknownColumn::new(row_count)))
                }
            }
        })
        .collect();

    let leftover = next.count();
    if leftover > 0 {
        tracing::debug!(leftover, "Physical columns not claimed by any descriptor");
    }
    columns
}

/// Synthesize the column for a constant-only descriptor.
pub fn constant_column(d: &Descriptor, row_count: usize, stats: &Arc<DecodeStats>) -> Arc<Column> {
    let column = match d {
        Descriptor::Builtin(BuiltinType::Missing) => Column::Missing(MissingColumn::new(row_count)),
        Descriptor::Builtin(BuiltinType::Unknown { tag, .. }) => {
            tracing::warn!(tag = tag.as_str(), "Unrecognized builtin tag, decoding as unknown");
            stats.record_unknown();
            Column::Unknown(UnknownColumn::new(row_count))
        }
        other => {
            let literal = LiteralColumn::new(other.constant_value(), other.resolve(), row_count);
            Column::Literal(match other.constant_builtin() {
                Some(BuiltinType::Date) => literal.with_temporal(TemporalUnit::Date),
                Some(BuiltinType::DateTime) => literal.with_temporal(TemporalUnit::DateTime),
                _ => literal,
            })
        }
    };
    Arc::new(column)
}

/// Decode one physical column according to its descriptor.
///
/// Plain primitives pass the physical column through unchanged, and so
/// does an Unknown physical column under any non-constant descriptor.
pub fn decode_column(d: &Descriptor, physical: Arc<Column>, stats: &Arc<DecodeStats>) -> Arc<Column> {
    if matches!(physical.as_ref(), Column::Unknown(_)) && !d.is_constant() {
        return physical;
    }
    let column = match d {
        Descriptor::Primitive(PrimitiveType::Char) => Column::Char(CharColumn::new(physical)),
        Descriptor::Primitive(p @ (PrimitiveType::Int128 | PrimitiveType::UInt128)) => {
            Column::WideInt(WideIntColumn::new(physical, p.is_signed_int()))
        }
        Descriptor::Primitive(_) => return physical,
        Descriptor::Builtin(b) => match b {
            BuiltinType::Date => Column::Temporal(TemporalColumn::new(physical, TemporalUnit::Date)),
            BuiltinType::DateTime => {
                Column::Temporal(TemporalColumn::new(physical, TemporalUnit::DateTime))
            }
            BuiltinType::Decimal { bits, digits } => {
                Column::Decimal(DecimalColumn::new(physical, *bits, *digits))
            }
            BuiltinType::Rational { bits } => Column::Rational(RationalColumn::new(physical, *bits)),
            BuiltinType::Hash
            | BuiltinType::AutoNumber
            | BuiltinType::FilePos
            | BuiltinType::Duration(_) => Column::Tagged(TaggedColumn::new(physical, b.clone())),
            BuiltinType::Missing | BuiltinType::Unknown { .. } => {
                return constant_column(d, physical.len(), stats);
            }
        },
        Descriptor::Value(members) => Column::Value(ValueColumn::decode(members, physical, stats)),
        Descriptor::Symbol(_) | Descriptor::Literal(_) | Descriptor::Const(_) => {
            return constant_column(d, physical.len(), stats);
        }
    };
    Arc::new(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::from_array;
    use crate::types::{ColumnType, Value};
    use arrow::array::{Int64Array, UInt32Array};

    fn stats() -> Arc<DecodeStats> {
        Arc::new(DecodeStats::new())
    }

    #[test]
    fn test_project_reinserts_constants() {
        let stats = stats();
        let physical = vec![Arc::new(from_array(Arc::new(Int64Array::from(vec![1, 2, 3])), &stats))];
        let descriptors = vec![
            Descriptor::symbol("output"),
            Descriptor::Primitive(PrimitiveType::Int64),
            Descriptor::Literal(Value::Int(42)),
        ];
        let cols = project(&descriptors, &physical, 3, &stats);

        assert_eq!(cols.len(), 3);
        for row in 0..3 {
            assert_eq!(cols[0].value(row), Some(Value::Symbol("output".into())));
            assert_eq!(cols[2].value(row), Some(Value::Int(42)));
        }
        assert_eq!(cols[1].value(2), Some(Value::Int(3)));
    }

    #[test]
    fn test_project_missing_physical_falls_back() {
        let stats = stats();
        let cols = project(&[Descriptor::Primitive(PrimitiveType::Int64)], &[], 2, &stats);
        assert_eq!(cols[0].column_type(), ColumnType::Unknown);
        assert_eq!(cols[0].len(), 2);
        assert_eq!(stats.snapshot().unknown_fallbacks, 1);
    }

    #[test]
    fn test_decode_char() {
        let stats = stats();
        let physical = Arc::new(from_array(Arc::new(UInt32Array::from(vec![0x62])), &stats));
        let col = decode_column(&Descriptor::Primitive(PrimitiveType::Char), physical, &stats);
        assert_eq!(col.value(0), Some(Value::Char('b')));
        assert_eq!(col.column_type(), ColumnType::Char);
    }

    #[test]
    fn test_decode_unknown_builtin_keeps_length() {
        let stats = stats();
        let physical = Arc::new(from_array(Arc::new(Int64Array::from(vec![1, 2])), &stats));
        let d = Descriptor::Builtin(BuiltinType::Unknown {
            tag: "Tensor".into(),
            physical: true,
        });
        let col = decode_column(&d, physical, &stats);
        assert_eq!(col.len(), 2);
        assert_eq!(col.value(1), Some(Value::Unknown));
        assert_eq!(stats.snapshot().unknown_fallbacks, 1);
    }

    #[test]
    fn test_decode_primitive_passthrough() {
        let stats = stats();
        let physical = Arc::new(from_array(Arc::new(Int64Array::from(vec![9])), &stats));
        let col = decode_column(&Descriptor::Primitive(PrimitiveType::Int64), Arc::clone(&physical), &stats);
        assert!(Arc::ptr_eq(&col, &physical));
    }
}
