//! Primitive type tokens shared by the wire model and the column decoders.

use std::fmt;

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// Primitive (scalar) type token.
///
/// `Int128`/`UInt128` have no single-array physical form: they travel as a
/// two-word fixed-size list. `Char` travels as a 32-bit code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Float16,
    Float32,
    Float64,
    String,
    Char,
}

impl PrimitiveType {
    /// Map a physical Arrow data type to its primitive token, if it is one.
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        let p = match data_type {
            DataType::Boolean => Self::Bool,
            DataType::Int8 => Self::Int8,
            DataType::Int16 => Self::Int16,
            DataType::Int32 => Self::Int32,
            DataType::Int64 => Self::Int64,
            DataType::UInt8 => Self::UInt8,
            DataType::UInt16 => Self::UInt16,
            DataType::UInt32 => Self::UInt32,
            DataType::UInt64 => Self::UInt64,
            DataType::Float16 => Self::Float16,
            DataType::Float32 => Self::Float32,
            DataType::Float64 => Self::Float64,
            DataType::Utf8 | DataType::LargeUtf8 => Self::String,
            _ => return None,
        };
        Some(p)
    }

    /// Width in bits for integer types, `None` otherwise.
    pub fn int_bits(self) -> Option<u8> {
        match self {
            Self::Int8 | Self::UInt8 => Some(8),
            Self::Int16 | Self::UInt16 => Some(16),
            Self::Int32 | Self::UInt32 => Some(32),
            Self::Int64 | Self::UInt64 => Some(64),
            Self::Int128 | Self::UInt128 => Some(128),
            _ => None,
        }
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::Int128
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Int128 => "Int128",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::UInt128 => "UInt128",
            Self::Float16 => "Float16",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::Char => "Char",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arrow() {
        assert_eq!(PrimitiveType::from_arrow(&DataType::Int64), Some(PrimitiveType::Int64));
        assert_eq!(PrimitiveType::from_arrow(&DataType::LargeUtf8), Some(PrimitiveType::String));
        assert_eq!(PrimitiveType::from_arrow(&DataType::Binary), None);
    }

    #[test]
    fn test_int_bits() {
        assert_eq!(PrimitiveType::Int16.int_bits(), Some(16));
        assert_eq!(PrimitiveType::UInt128.int_bits(), Some(128));
        assert_eq!(PrimitiveType::Float64.int_bits(), None);
        assert!(PrimitiveType::Int32.is_signed_int());
        assert!(!PrimitiveType::UInt32.is_signed_int());
    }
}
