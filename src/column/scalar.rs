//! Specialized scalar decoders layered over a physical column.
//!
//! Each decoder wraps the physical column it reads from and reinterprets
//! its integers: characters from code points, 128-bit integers from word
//! pairs, fixed-point decimals, exact rationals, epoch dates/timestamps,
//! and the remaining integer-backed builtins.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use super::Column;
use crate::types::value::{date_from_days, datetime_from_millis, int128_from_words, uint128_from_words};
use crate::types::{BuiltinType, ColumnType, Decimal, Rational, Value};

// ── CharColumn ─────────────────────────────────────────────────────

/// Single character stored as a 32-bit code point.
#[derive(Debug)]
pub struct CharColumn {
    physical: Arc<Column>,
}

impl CharColumn {
    pub fn new(physical: Arc<Column>) -> Self {
        Self { physical }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Char
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        self.physical
            .integer_at(row)
            .and_then(|cp| u32::try_from(cp).ok())
            .and_then(char::from_u32)
            .map_or(Value::Unknown, Value::Char)
    }
}

// ── WideIntColumn ──────────────────────────────────────────────────

/// 128-bit integer reconstructed from (low, high) 64-bit words.
#[derive(Debug)]
pub struct WideIntColumn {
    physical: Arc<Column>,
    signed: bool,
}

impl WideIntColumn {
    pub fn new(physical: Arc<Column>, signed: bool) -> Self {
        Self { physical, signed }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        if self.signed {
            ColumnType::BigInt
        } else {
            ColumnType::BigUInt
        }
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        if let Column::List(list) = self.physical.as_ref() {
            return match list.words_at(row).as_deref() {
                Some([low, high]) if self.signed => Value::BigInt(int128_from_words(*low, *high)),
                Some([low, high]) => Value::BigUInt(uint128_from_words(*low, *high)),
                _ => Value::Unknown,
            };
        }
        // narrower physical integer standing in for a wide one
        match self.physical.integer_at(row) {
            Some(v) if self.signed => Value::BigInt(v),
            Some(v) => u128::try_from(v).map_or(Value::Unknown, Value::BigUInt),
            None => Value::Unknown,
        }
    }
}

// ── DecimalColumn ──────────────────────────────────────────────────

/// Fixed-point decimal: stored integer × 10^(−digits).
///
/// 8/16/32/64-bit decimals are a plain integer column; 128-bit decimals
/// are a two-word list.
#[derive(Debug)]
pub struct DecimalColumn {
    physical: Arc<Column>,
    bits: u8,
    digits: u8,
}

impl DecimalColumn {
    pub fn new(physical: Arc<Column>, bits: u8, digits: u8) -> Self {
        Self {
            physical,
            bits,
            digits,
        }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Decimal {
            bits: self.bits,
            digits: self.digits,
        }
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        self.physical
            .integer_at(row)
            .map_or(Value::Unknown, |v| Value::Decimal(Decimal::new(v, self.digits)))
    }
}

// ── RationalColumn ─────────────────────────────────────────────────

/// Exact rational from a (numerator, denominator) pair.
///
/// Pairs up to 64 bits arrive as a two-field struct (or a two-item list);
/// 128-bit rationals arrive as a four-word list
/// `(num_low, num_high, den_low, den_high)`.
#[derive(Debug)]
pub struct RationalColumn {
    physical: Arc<Column>,
    bits: u8,
}

impl RationalColumn {
    pub fn new(physical: Arc<Column>, bits: u8) -> Self {
        Self { physical, bits }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Rational { bits: self.bits }
    }

    fn pair_at(&self, row: usize) -> Option<(i128, i128)> {
        match self.physical.as_ref() {
            Column::Struct(s) => match s.children() {
                [num, den, ..] => Some((num.integer_at(row)?, den.integer_at(row)?)),
                _ => None,
            },
            Column::List(list) if list.width() == 4 => match list.words_at(row)?.as_slice() {
                [nl, nh, dl, dh] => Some((int128_from_words(*nl, *nh), int128_from_words(*dl, *dh))),
                _ => None,
            },
            Column::List(list) => Some((list.item_integer(row, 0)?, list.item_integer(row, 1)?)),
            _ => None,
        }
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        self.pair_at(row)
            .map_or(Value::Unknown, |(n, d)| Value::Rational(Rational::new(n, d)))
    }
}

// ── TemporalColumn ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalUnit {
    /// Days since the epoch, day 1 = 0001-01-01.
    Date,
    /// Milliseconds since 0000-12-31T00:00:00.
    DateTime,
}

impl TemporalUnit {
    /// Dates render without a time part.
    pub fn format(self, t: &DateTime<Utc>) -> String {
        match self {
            TemporalUnit::Date => t.format("%Y-%m-%d").to_string(),
            TemporalUnit::DateTime => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Epoch-based date or timestamp, decoded to one instant type.
#[derive(Debug)]
pub struct TemporalColumn {
    physical: Arc<Column>,
    unit: TemporalUnit,
}

impl TemporalColumn {
    pub fn new(physical: Arc<Column>, unit: TemporalUnit) -> Self {
        Self { physical, unit }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        match self.unit {
            TemporalUnit::Date => ColumnType::Date,
            TemporalUnit::DateTime => ColumnType::DateTime,
        }
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        let raw = self.physical.integer_at(row).and_then(|v| i64::try_from(v).ok());
        let instant = match self.unit {
            TemporalUnit::Date => raw.and_then(date_from_days),
            TemporalUnit::DateTime => raw.and_then(datetime_from_millis),
        };
        instant.map_or(Value::Unknown, Value::Instant)
    }

    pub(crate) fn string_at(&self, row: usize) -> String {
        match self.value_at(row) {
            Value::Instant(t) => self.unit.format(&t),
            other => other.to_string(),
        }
    }
}

// ── TaggedColumn ───────────────────────────────────────────────────

/// Integer-backed builtins without bespoke arithmetic: content hashes,
/// auto-increment ids, file positions, and calendar-unit durations.
#[derive(Debug)]
pub struct TaggedColumn {
    physical: Arc<Column>,
    builtin: BuiltinType,
}

impl TaggedColumn {
    pub fn new(physical: Arc<Column>, builtin: BuiltinType) -> Self {
        Self { physical, builtin }
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_builtin(&self.builtin)
    }

    pub(crate) fn value_at(&self, row: usize) -> Value {
        if self.physical.is_null_at(row) {
            return Value::Null;
        }
        let decoded = match &self.builtin {
            BuiltinType::Hash => match self.physical.as_ref() {
                Column::List(list) => match list.words_at(row).as_deref() {
                    Some([low, high]) => Some(Value::BigUInt(uint128_from_words(*low, *high))),
                    _ => None,
                },
                other => other
                    .integer_at(row)
                    .and_then(|v| u128::try_from(v).ok())
                    .map(Value::BigUInt),
            },
            BuiltinType::AutoNumber | BuiltinType::FilePos => self
                .physical
                .integer_at(row)
                .and_then(|v| i64::try_from(v).ok())
                .map(Value::Int),
            BuiltinType::Duration(unit) => self
                .physical
                .integer_at(row)
                .and_then(|v| i64::try_from(v).ok())
                .map(|v| Value::Duration(*unit, v)),
            _ => None,
        };
        decoded.unwrap_or(Value::Unknown)
    }
}
