//! Caller-facing logical type tokens.

use std::fmt;

use super::builtin::BuiltinType;
use super::primitive::PrimitiveType;
use super::value::{DurationUnit, Value};

/// Resolved type of one logical column.
///
/// Constant positions resolve to the constant itself (`Symbol` or
/// `Constant`), which is what signature-prefix queries match against.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Bool, integers up to 64 bits, floats, and strings.
    Primitive(PrimitiveType),
    /// 128-bit signed integer.
    BigInt,
    /// 128-bit unsigned integer.
    BigUInt,
    Char,
    Date,
    DateTime,
    Decimal { bits: u8, digits: u8 },
    Rational { bits: u8 },
    Hash,
    FilePos,
    AutoNumber,
    Duration(DurationUnit),
    Missing,
    Symbol(String),
    Constant(Value),
    /// Generic (user-defined) value type with the given member types.
    Value(Vec<ColumnType>),
    /// Physical fixed-size list of `width` items.
    List(Box<ColumnType>, usize),
    /// Physical nested field-list.
    Struct(Vec<ColumnType>),
    Null,
    /// Union column whose constituents disagree on their type.
    Mixed,
    Unknown,
}

impl ColumnType {
    /// Collapse a primitive token into its caller-facing form.
    pub fn from_primitive(p: PrimitiveType) -> Self {
        match p {
            PrimitiveType::Int128 => Self::BigInt,
            PrimitiveType::UInt128 => Self::BigUInt,
            PrimitiveType::Char => Self::Char,
            other => Self::Primitive(other),
        }
    }

    pub fn from_builtin(b: &BuiltinType) -> Self {
        match b {
            BuiltinType::AutoNumber => Self::AutoNumber,
            BuiltinType::Date => Self::Date,
            BuiltinType::DateTime => Self::DateTime,
            BuiltinType::Decimal { bits, digits } => Self::Decimal {
                bits: *bits,
                digits: *digits,
            },
            BuiltinType::Hash => Self::Hash,
            BuiltinType::FilePos => Self::FilePos,
            BuiltinType::Rational { bits } => Self::Rational { bits: *bits },
            BuiltinType::Missing => Self::Missing,
            BuiltinType::Duration(unit) => Self::Duration(*unit),
            BuiltinType::Unknown { .. } => Self::Unknown,
        }
    }

    /// Whether the position holds a single repeated constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Symbol(_) | Self::Constant(_))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::BigInt => f.write_str("BigInt"),
            Self::BigUInt => f.write_str("BigUInt"),
            Self::Char => f.write_str("Char"),
            Self::Date => f.write_str("Date"),
            Self::DateTime => f.write_str("DateTime"),
            Self::Decimal { bits, digits } => write!(f, "Decimal{}({})", bits, digits),
            Self::Rational { bits } => write!(f, "Rational{}", bits),
            Self::Hash => f.write_str("Hash"),
            Self::FilePos => f.write_str("FilePos"),
            Self::AutoNumber => f.write_str("AutoNumber"),
            Self::Duration(unit) => f.write_str(unit.name()),
            Self::Missing => f.write_str("Missing"),
            Self::Symbol(s) => write!(f, ":{}", s),
            Self::Constant(v) => write!(f, "{}", v),
            Self::Value(members) => write_list(f, "(", members, ")"),
            Self::List(item, width) => write!(f, "[{}; {}]", item, width),
            Self::Struct(fields) => write_list(f, "{", fields, "}"),
            Self::Null => f.write_str("Null"),
            Self::Mixed => f.write_str("Mixed"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[ColumnType],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}
