//! Decoded logical values and the scalar conversions behind them.
//!
//! Every column read produces a [`Value`]. The specialized scalar
//! encodings (fixed-point decimals, rationals, 128-bit integers, epoch
//! dates) are reconstructed here from their physical integer words.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ── Value ──────────────────────────────────────────────────────────

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Physical null, or a padding cell of a union column.
    Null,
    /// The builtin "missing" sentinel. A valid value, not an error.
    Missing,
    /// A cell whose physical encoding is not understood.
    Unknown,
    Bool(bool),
    Int(i64),
    UInt(u64),
    BigInt(i128),
    BigUInt(u128),
    Float(f64),
    Char(char),
    String(String),
    /// A named constant such as a relation name or field tag.
    Symbol(String),
    Decimal(Decimal),
    Rational(Rational),
    /// Dates and timestamps both decode to one wall-clock instant.
    Instant(DateTime<Utc>),
    Duration(DurationUnit, i64),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value, used by decoders layered on top of
    /// integer physical columns.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(*v as i128),
            Value::UInt(v) => Some(*v as i128),
            Value::BigInt(v) => Some(*v),
            Value::BigUInt(v) => i128::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Missing => f.write_str("missing"),
            Value::Unknown => f.write_str("unknown"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::BigUInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => f.write_str(s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Rational(r) => write!(f, "{}", r),
            Value::Instant(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Duration(unit, n) => write!(f, "{} {}", n, unit.name()),
            Value::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

// ── Decimal ────────────────────────────────────────────────────────

/// Fixed-point decimal: `value × 10^(−digits)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub value: i128,
    pub digits: u8,
}

impl Decimal {
    pub fn new(value: i128, digits: u8) -> Self {
        Self { value, digits }
    }

    /// Lossy floating-point view.
    pub fn to_f64(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.digits as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.digits == 0 {
            return write!(f, "{}", self.value);
        }
        let sign = if self.value < 0 { "-" } else { "" };
        let magnitude = self.value.unsigned_abs().to_string();
        let digits = self.digits as usize;
        let padded = if magnitude.len() <= digits {
            format!("{}{}", "0".repeat(digits + 1 - magnitude.len()), magnitude)
        } else {
            magnitude
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - digits);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

// ── Rational ───────────────────────────────────────────────────────

/// Exact rational number, kept in lowest terms with a positive denominator.
///
/// A zero denominator is stored as given; no normalization is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i128,
    denominator: i128,
}

impl Rational {
    pub fn new(numerator: i128, denominator: i128) -> Self {
        if denominator == 0 {
            return Self { numerator, denominator };
        }
        let g = gcd(numerator.unsigned_abs(), denominator.unsigned_abs());
        let (mut n, mut d) = (numerator, denominator);
        if g > 1 {
            // g divides both, and g <= |d| fits in i128
            n /= g as i128;
            d /= g as i128;
        }
        if d < 0 {
            n = n.wrapping_neg();
            d = d.wrapping_neg();
        }
        Self {
            numerator: n,
            denominator: d,
        }
    }

    pub fn numerator(&self) -> i128 {
        self.numerator
    }

    pub fn denominator(&self) -> i128 {
        self.denominator
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// ── Durations ──────────────────────────────────────────────────────

/// Calendar unit of a builtin duration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl DurationUnit {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let unit = match tag {
            "Year" => Self::Year,
            "Month" => Self::Month,
            "Week" => Self::Week,
            "Day" => Self::Day,
            "Hour" => Self::Hour,
            "Minute" => Self::Minute,
            "Second" => Self::Second,
            "Millisecond" => Self::Millisecond,
            "Microsecond" => Self::Microsecond,
            "Nanosecond" => Self::Nanosecond,
            _ => return None,
        };
        Some(unit)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
            Self::Hour => "Hour",
            Self::Minute => "Minute",
            Self::Second => "Second",
            Self::Millisecond => "Millisecond",
            Self::Microsecond => "Microsecond",
            Self::Nanosecond => "Nanosecond",
        }
    }
}

// ── Scalar Reconstruction ──────────────────────────────────────────

/// Signed 128-bit integer from its (low, high) 64-bit words.
pub fn int128_from_words(low: u64, high: u64) -> i128 {
    ((high as i64 as i128) << 64) | low as i128
}

/// Unsigned 128-bit integer from its (low, high) 64-bit words.
pub fn uint128_from_words(low: u64, high: u64) -> u128 {
    ((high as u128) << 64) | low as u128
}

/// Midnight of day `days`, where day 1 is 0001-01-01.
pub fn date_from_days(days: i64) -> Option<DateTime<Utc>> {
    let days = i32::try_from(days).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Instant `millis` milliseconds after 0000-12-31T00:00:00, the same epoch
/// as [`date_from_days`] at millisecond granularity.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    let epoch = NaiveDate::from_ymd_opt(0, 12, 31)?.and_hms_opt(0, 0, 0)?;
    let instant = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;
    Some(Utc.from_utc_datetime(&instant))
}
