//! Transaction metadata: relation id → signature.
//!
//! The wire message is decoded once (JSON or MessagePack) and converted
//! into the descriptor algebra. Constants carried on the wire become
//! symbols, literals, or fully-lifted composite values.

pub mod wire;

use std::collections::HashMap;

use crate::error::Result;
use crate::types::{Descriptor, PrimitiveType, Signature, Value};

pub use wire::{MetadataMessage, PrimitiveValueMessage, RelTypeMessage, RelationMetadata};

/// Decoded metadata for one transaction result.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    ids: Vec<String>,
    signatures: HashMap<String, Signature>,
}

impl Metadata {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let msg: MetadataMessage = serde_json::from_slice(bytes)?;
        Ok(Self::from_message(msg))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        let msg: MetadataMessage = rmp_serde::from_slice(bytes)?;
        Ok(Self::from_message(msg))
    }

    pub fn from_message(msg: MetadataMessage) -> Self {
        let mut metadata = Metadata::default();
        for rel in msg.relations {
            let signature = Signature::new(rel.signature.iter().map(descriptor_from_wire).collect());
            if metadata.signatures.insert(rel.relation_id.clone(), signature).is_some() {
                tracing::warn!(
                    relation = rel.relation_id.as_str(),
                    "Duplicate relation id in metadata, keeping last"
                );
            } else {
                metadata.ids.push(rel.relation_id);
            }
        }
        tracing::debug!(relations = metadata.ids.len(), "Decoded metadata");
        metadata
    }

    /// Signature bound to `id`.
    pub fn signature_of(&self, id: &str) -> Option<&Signature> {
        self.signatures.get(id)
    }

    /// Relation ids in message order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Convert one wire position into a descriptor.
pub fn descriptor_from_wire(t: &RelTypeMessage) -> Descriptor {
    match t {
        RelTypeMessage::PrimitiveType(p) => Descriptor::Primitive(*p),
        RelTypeMessage::ValueType { argument_types } => {
            Descriptor::value_type(argument_types.iter().map(descriptor_from_wire).collect())
        }
        RelTypeMessage::ConstantType { rel_type, value } => constant_from_wire(rel_type, value),
    }
}

fn constant_from_wire(rel_type: &RelTypeMessage, values: &[PrimitiveValueMessage]) -> Descriptor {
    match rel_type {
        RelTypeMessage::PrimitiveType(PrimitiveType::String) if values.len() == 1 => {
            match values[0].to_value() {
                Value::String(s) => Descriptor::Symbol(s),
                other => Descriptor::Literal(other),
            }
        }
        RelTypeMessage::PrimitiveType(_) => Descriptor::Literal(
            values
                .first()
                .map_or(Value::Unknown, PrimitiveValueMessage::to_value),
        ),
        RelTypeMessage::ValueType { argument_types } => {
            let mut literals = values.iter().map(PrimitiveValueMessage::to_value);
            let members = lift_members(argument_types, &mut literals);
            if literals.next().is_some() {
                tracing::warn!("Constant value type carries more literals than physical members");
            }
            Descriptor::Const(members)
        }
        // a constant of a constant is the inner constant
        RelTypeMessage::ConstantType { rel_type, value } => constant_from_wire(rel_type, value),
    }
}

/// Rebuild a value type's members with every physical member replaced, in
/// order, by the next literal.
fn lift_members(args: &[RelTypeMessage], literals: &mut impl Iterator<Item = Value>) -> Vec<Descriptor> {
    args.iter()
        .map(|arg| match arg {
            RelTypeMessage::PrimitiveType(_) => {
                Descriptor::Literal(literals.next().unwrap_or(Value::Unknown))
            }
            RelTypeMessage::ValueType { argument_types } => {
                Descriptor::Const(lift_members(argument_types, literals))
            }
            RelTypeMessage::ConstantType { rel_type, value } => constant_from_wire(rel_type, value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuiltinType, ColumnType, Rational};

    fn prim(p: PrimitiveType) -> RelTypeMessage {
        RelTypeMessage::PrimitiveType(p)
    }

    fn sym(s: &str) -> RelTypeMessage {
        RelTypeMessage::ConstantType {
            rel_type: Box::new(prim(PrimitiveType::String)),
            value: vec![PrimitiveValueMessage::String(s.into())],
        }
    }

    fn builtin(tag: &str, rest: Vec<RelTypeMessage>) -> Vec<RelTypeMessage> {
        let mut args = vec![sym("rel"), sym("base"), sym(tag)];
        args.extend(rest);
        args
    }

    fn message() -> MetadataMessage {
        MetadataMessage {
            relations: vec![
                RelationMetadata {
                    relation_id: "/:output/Int64".into(),
                    signature: vec![sym("output"), prim(PrimitiveType::Int64)],
                },
                RelationMetadata {
                    relation_id: "/:when/Date".into(),
                    signature: vec![
                        sym("when"),
                        RelTypeMessage::ConstantType {
                            rel_type: Box::new(RelTypeMessage::ValueType {
                                argument_types: builtin("Date", vec![prim(PrimitiveType::Int64)]),
                            }),
                            value: vec![PrimitiveValueMessage::Int64(737791)],
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_symbols_and_primitives() {
        let md = Metadata::from_message(message());
        assert_eq!(md.ids().collect::<Vec<_>>(), vec!["/:output/Int64", "/:when/Date"]);
        let sig = md.signature_of("/:output/Int64").unwrap();
        assert_eq!(
            sig.descriptors(),
            &[Descriptor::symbol("output"), Descriptor::Primitive(PrimitiveType::Int64)]
        );
        assert!(md.signature_of("/:nope").is_none());
    }

    #[test]
    fn test_constant_value_type_lifts_literals() {
        let md = Metadata::from_message(message());
        let sig = md.signature_of("/:when/Date").unwrap();
        assert_eq!(sig.physical_count(), 0);
        match &sig.descriptors()[1].constant_value() {
            Value::Instant(t) => assert_eq!(t.format("%Y-%m-%d").to_string(), "2021-01-01"),
            other => panic!("expected instant, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_value_type() {
        let t = RelTypeMessage::ValueType {
            argument_types: builtin(
                "FixedDecimal",
                vec![
                    RelTypeMessage::ConstantType {
                        rel_type: Box::new(prim(PrimitiveType::Int64)),
                        value: vec![PrimitiveValueMessage::Int64(64)],
                    },
                    RelTypeMessage::ConstantType {
                        rel_type: Box::new(prim(PrimitiveType::Int64)),
                        value: vec![PrimitiveValueMessage::Int64(2)],
                    },
                    prim(PrimitiveType::Int64),
                ],
            ),
        };
        let d = descriptor_from_wire(&t);
        assert_eq!(d, Descriptor::Builtin(BuiltinType::Decimal { bits: 64, digits: 2 }));
        assert_eq!(d.resolve(), ColumnType::Decimal { bits: 64, digits: 2 });
    }

    #[test]
    fn test_constant_rational() {
        let t = RelTypeMessage::ConstantType {
            rel_type: Box::new(RelTypeMessage::ValueType {
                argument_types: builtin(
                    "Rational",
                    vec![prim(PrimitiveType::Int64), prim(PrimitiveType::Int64)],
                ),
            }),
            value: vec![PrimitiveValueMessage::Int64(3), PrimitiveValueMessage::Int64(4)],
        };
        let d = descriptor_from_wire(&t);
        assert!(d.is_constant());
        assert_eq!(d.constant_value(), Value::Rational(Rational::new(3, 4)));
    }

    #[test]
    fn test_non_string_constant_is_literal() {
        let t = RelTypeMessage::ConstantType {
            rel_type: Box::new(prim(PrimitiveType::Int64)),
            value: vec![PrimitiveValueMessage::Int64(42)],
        };
        assert_eq!(descriptor_from_wire(&t), Descriptor::Literal(Value::Int(42)));
    }

    #[test]
    fn test_json_and_msgpack_agree() {
        let msg = message();
        let json = serde_json::to_vec(&msg).unwrap();
        let packed = rmp_serde::to_vec_named(&msg).unwrap();

        let a = Metadata::from_json(&json).unwrap();
        let b = Metadata::from_msgpack(&packed).unwrap();
        for id in a.ids() {
            assert_eq!(a.signature_of(id), b.signature_of(id));
        }
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_invalid_metadata() {
        let err = Metadata::from_json(b"{\"relations\": 3}").unwrap_err();
        assert_eq!(err.code(), "INVALID_FORMAT");
    }
}
