//! Property tests: union row translation and arity padding.

use std::sync::Arc;

use proptest::prelude::*;

use relview::column::{Column, LiteralColumn, UnionColumn};
use relview::types::PrimitiveType;
use relview::{ColumnType, DecodeStats, Descriptor, Partition, Relation, Signature, Value};

fn tagged(tag: i64, len: usize) -> Arc<Column> {
    Arc::new(Column::Literal(LiteralColumn::new(
        Value::Int(tag),
        ColumnType::Primitive(PrimitiveType::Int64),
        len,
    )))
}

proptest! {
    #[test]
    fn locate_matches_running_offsets(lens in prop::collection::vec(0usize..20, 0..8)) {
        let parts: Vec<Arc<Column>> = lens
            .iter()
            .enumerate()
            .map(|(i, len)| tagged(i as i64, *len))
            .collect();
        let union = UnionColumn::new(parts);
        let total: usize = lens.iter().sum();
        prop_assert_eq!(union.len(), total);

        let mut row = 0;
        for (i, len) in lens.iter().enumerate() {
            for local in 0..*len {
                prop_assert_eq!(union.locate(row), Some((i, local)));
                row += 1;
            }
        }
        prop_assert_eq!(union.locate(total), None);

        let column = Column::Union(union);
        prop_assert_eq!(column.value(total), None);
        if total > 0 {
            prop_assert!(column.value(total - 1).is_some());
        }
    }

    #[test]
    fn union_pads_to_widest_constant_relation(arities in prop::collection::vec(0usize..4, 1..5)) {
        let relations: Vec<Arc<Relation>> = arities
            .iter()
            .map(|&arity| {
                let mut descriptors = vec![Descriptor::symbol("output")];
                descriptors.extend((0..arity).map(|i| Descriptor::Literal(Value::Int(i as i64))));
                Arc::new(Relation::from_partition(
                    "/:output",
                    Arc::new(Partition::empty()),
                    Signature::new(descriptors),
                    Arc::new(DecodeStats::new()),
                ))
            })
            .collect();

        let u = Relation::union(&relations);
        let widest = arities.iter().map(|a| a + 1).max().unwrap_or(0);
        prop_assert_eq!(u.num_columns(), widest);
        // fully-constant relations contribute one row each
        prop_assert_eq!(u.row_count(), relations.len());

        for (r, &arity) in arities.iter().enumerate() {
            for c in 0..widest {
                let expected = if c == 0 {
                    Value::Symbol("output".into())
                } else if c <= arity {
                    Value::Int((c - 1) as i64)
                } else {
                    Value::Null
                };
                prop_assert_eq!(u.value(c, r), Some(expected));
            }
        }
    }
}
