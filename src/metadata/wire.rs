//! Serde model of the metadata message.
//!
//! Shape (JSON form):
//!
//! ```json
//! {"relations": [
//!   {"relation_id": "/:output/Int64",
//!    "signature": [
//!      {"constant_type": {"rel_type": {"primitive_type": "String"},
//!                         "value": [{"string": "output"}]}},
//!      {"primitive_type": "Int64"}
//!    ]}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::types::value::{int128_from_words, uint128_from_words};
use crate::types::{PrimitiveType, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataMessage {
    #[serde(default)]
    pub relations: Vec<RelationMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationMetadata {
    pub relation_id: String,
    #[serde(default)]
    pub signature: Vec<RelTypeMessage>,
}

/// One position of a wire signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelTypeMessage {
    PrimitiveType(PrimitiveType),
    ValueType {
        #[serde(default)]
        argument_types: Vec<RelTypeMessage>,
    },
    ConstantType {
        rel_type: Box<RelTypeMessage>,
        #[serde(default)]
        value: Vec<PrimitiveValueMessage>,
    },
}

/// Scalar carried by a constant type.
///
/// 128-bit integers travel as (low, high) 64-bit words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveValueMessage {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128 { low: u64, high: u64 },
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128 { low: u64, high: u64 },
    Float32(f32),
    Float64(f64),
    String(String),
    Char(u32),
}

impl PrimitiveValueMessage {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int8(v) => Value::Int(i64::from(*v)),
            Self::Int16(v) => Value::Int(i64::from(*v)),
            Self::Int32(v) => Value::Int(i64::from(*v)),
            Self::Int64(v) => Value::Int(*v),
            Self::Int128 { low, high } => Value::BigInt(int128_from_words(*low, *high)),
            Self::UInt8(v) => Value::UInt(u64::from(*v)),
            Self::UInt16(v) => Value::UInt(u64::from(*v)),
            Self::UInt32(v) => Value::UInt(u64::from(*v)),
            Self::UInt64(v) => Value::UInt(*v),
            Self::UInt128 { low, high } => Value::BigUInt(uint128_from_words(*low, *high)),
            Self::Float32(v) => Value::Float(f64::from(*v)),
            Self::Float64(v) => Value::Float(*v),
            Self::String(s) => Value::String(s.clone()),
            Self::Char(c) => char::from_u32(*c).map_or(Value::Unknown, Value::Char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_value_conversion() {
        assert_eq!(PrimitiveValueMessage::Int8(-3).to_value(), Value::Int(-3));
        assert_eq!(PrimitiveValueMessage::UInt32(9).to_value(), Value::UInt(9));
        assert_eq!(
            PrimitiveValueMessage::Int128 { low: u64::MAX, high: u64::MAX }.to_value(),
            Value::BigInt(-1)
        );
        assert_eq!(
            PrimitiveValueMessage::UInt128 { low: 0, high: 1 }.to_value(),
            Value::BigUInt(1u128 << 64)
        );
        assert_eq!(PrimitiveValueMessage::Char(0x61).to_value(), Value::Char('a'));
        assert_eq!(PrimitiveValueMessage::Char(0xD800).to_value(), Value::Unknown);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"relations": [{"relation_id": "r", "signature": [
            {"constant_type": {"rel_type": {"primitive_type": "String"}, "value": [{"string": "output"}]}},
            {"value_type": {"argument_types": [{"primitive_type": "Int64"}]}},
            {"constant_type": {"rel_type": {"primitive_type": "Int128"}, "value": [{"int128": {"low": 5, "high": 0}}]}}
        ]}]}"#;
        let msg: MetadataMessage = serde_json::from_str(json).unwrap();
        let sig = &msg.relations[0].signature;
        assert_eq!(sig.len(), 3);
        assert_eq!(
            sig[1],
            RelTypeMessage::ValueType {
                argument_types: vec![RelTypeMessage::PrimitiveType(PrimitiveType::Int64)]
            }
        );
        match &sig[2] {
            RelTypeMessage::ConstantType { value, .. } => {
                assert_eq!(value[0], PrimitiveValueMessage::Int128 { low: 5, high: 0 })
            }
            other => panic!("expected constant, got {:?}", other),
        }
    }
}
