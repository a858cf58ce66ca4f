//! Builtin value-type tags.
//!
//! A builtin appears on the wire as a value type whose arguments start with
//! the namespace symbols `rel`, `base` followed by a tag symbol, e.g.
//! `(rel, base, Date, Int64)` or `(rel, base, FixedDecimal, 64, 2, Int64)`.
//! These decode to first-class scalars instead of generic nested values.

use std::fmt;

use super::descriptor::Descriptor;
use super::value::{
    date_from_days, datetime_from_millis, DurationUnit, Decimal, Rational, Value,
};

/// Namespace prefix shared by every builtin value type.
pub const BUILTIN_NAMESPACE: [&str; 2] = ["rel", "base"];

/// A builtin value type recognized by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    AutoNumber,
    Date,
    DateTime,
    Decimal { bits: u8, digits: u8 },
    Hash,
    FilePos,
    Rational { bits: u8 },
    Missing,
    Duration(DurationUnit),
    /// Tag not in the table. `physical` records whether the tagged value
    /// still occupies a physical column.
    Unknown { tag: String, physical: bool },
}

impl BuiltinType {
    /// Parse a tag and the arguments that follow it.
    ///
    /// Never fails: a malformed or unrecognized builtin yields `Unknown`.
    pub fn parse(tag: &str, args: &[Descriptor]) -> Self {
        let parsed = match tag {
            "AutoNumber" => Some(Self::AutoNumber),
            "Date" => Some(Self::Date),
            "DateTime" => Some(Self::DateTime),
            "Hash" => Some(Self::Hash),
            "FilePos" => Some(Self::FilePos),
            "Missing" => Some(Self::Missing),
            "FixedDecimal" => parse_decimal(args),
            "Rational" => parse_rational(args),
            other => DurationUnit::from_tag(other).map(Self::Duration),
        };
        parsed.unwrap_or_else(|| Self::Unknown {
            tag: tag.to_string(),
            physical: args.iter().any(|a| !a.is_constant()),
        })
    }

    /// Whether this builtin has no physical backing.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Unknown { physical, .. } => !physical,
            _ => false,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::AutoNumber => "AutoNumber",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Decimal { .. } => "FixedDecimal",
            Self::Hash => "Hash",
            Self::FilePos => "FilePos",
            Self::Rational { .. } => "Rational",
            Self::Missing => "Missing",
            Self::Duration(unit) => unit.name(),
            Self::Unknown { tag, .. } => tag,
        }
    }

    /// Decode a fully-constant instance from its lifted literal arguments.
    pub fn constant_value(&self, literals: &[Value]) -> Value {
        let int_at = |i: usize| literals.get(i).and_then(Value::as_i128);
        let decoded = match self {
            Self::Missing => Some(Value::Missing),
            Self::Date => int_at(0)
                .and_then(|d| i64::try_from(d).ok())
                .and_then(date_from_days)
                .map(Value::Instant),
            Self::DateTime => int_at(0)
                .and_then(|ms| i64::try_from(ms).ok())
                .and_then(datetime_from_millis)
                .map(Value::Instant),
            Self::Decimal { digits, .. } => {
                // literals carry (bits, digits, value); the value is last
                literals
                    .last()
                    .and_then(Value::as_i128)
                    .map(|v| Value::Decimal(Decimal::new(v, *digits)))
            }
            Self::Rational { .. } => match (int_at(0), int_at(1)) {
                (Some(n), Some(d)) => Some(Value::Rational(Rational::new(n, d))),
                _ => None,
            },
            Self::Hash => literals.first().and_then(|v| match v {
                Value::BigUInt(h) => Some(Value::BigUInt(*h)),
                other => other
                    .as_i128()
                    .and_then(|h| u128::try_from(h).ok())
                    .map(Value::BigUInt),
            }),
            Self::AutoNumber | Self::FilePos => int_at(0)
                .and_then(|v| i64::try_from(v).ok())
                .map(Value::Int),
            Self::Duration(unit) => int_at(0)
                .and_then(|v| i64::try_from(v).ok())
                .map(|v| Value::Duration(*unit, v)),
            Self::Unknown { .. } => None,
        };
        decoded.unwrap_or(Value::Unknown)
    }
}

fn parse_decimal(args: &[Descriptor]) -> Option<BuiltinType> {
    let bits = literal_int(args.first()?)?;
    let digits = literal_int(args.get(1)?)?;
    Some(BuiltinType::Decimal {
        bits: u8::try_from(bits).ok()?,
        digits: u8::try_from(digits).ok()?,
    })
}

fn parse_rational(args: &[Descriptor]) -> Option<BuiltinType> {
    match args.first()? {
        Descriptor::Primitive(p) => Some(BuiltinType::Rational { bits: p.int_bits()? }),
        // constant rationals carry literals; the width is not recoverable
        Descriptor::Literal(_) => Some(BuiltinType::Rational { bits: 64 }),
        _ => None,
    }
}

fn literal_int(d: &Descriptor) -> Option<i128> {
    match d {
        Descriptor::Literal(v) => v.as_i128(),
        _ => None,
    }
}

/// Whether `args` is a builtin-tagged sequence; returns the tag and the
/// arguments following it.
pub fn split_builtin(args: &[Descriptor]) -> Option<(&str, &[Descriptor])> {
    if args.len() < 3 {
        return None;
    }
    for (arg, expected) in args.iter().zip(BUILTIN_NAMESPACE) {
        match arg {
            Descriptor::Symbol(s) if s == expected => {}
            _ => return None,
        }
    }
    match &args[2] {
        Descriptor::Symbol(tag) => Some((tag.as_str(), &args[3..])),
        _ => None,
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal { bits, digits } => write!(f, "Decimal{}({})", bits, digits),
            Self::Rational { bits } => write!(f, "Rational{}", bits),
            other => f.write_str(other.tag()),
        }
    }
}
