//! Recursive type-descriptor algebra.
//!
//! A relation's logical schema is a [`Signature`]: an ordered list of
//! [`Descriptor`]s, one per logical column. Constant positions (symbols,
//! literals, fully-lifted composite values) have no physical backing and are
//! re-synthesized at projection time; every other position consumes exactly
//! one physical column of the partition, in order.

use std::fmt;

use super::builtin::{split_builtin, BuiltinType};
use super::column_type::ColumnType;
use super::primitive::PrimitiveType;
use super::value::Value;

/// Type descriptor for one logical position.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(PrimitiveType),
    /// Named constant such as a relation name or field tag.
    Symbol(String),
    /// Literal scalar standing for itself in every row.
    Literal(Value),
    /// Fully-lifted composite value (e.g. a constant tuple or date).
    Const(Vec<Descriptor>),
    /// Value-typed column whose members are partly constant, partly physical.
    Value(Vec<Descriptor>),
    Builtin(BuiltinType),
}

impl Descriptor {
    pub fn symbol(s: impl Into<String>) -> Self {
        Descriptor::Symbol(s.into())
    }

    /// Build a value-type descriptor, recognizing builtin-tagged sequences.
    pub fn value_type(args: Vec<Descriptor>) -> Self {
        match split_builtin(&args) {
            Some((tag, rest)) => Descriptor::Builtin(BuiltinType::parse(tag, rest)),
            None => Descriptor::Value(args),
        }
    }

    /// Whether the position has no physical backing.
    pub fn is_constant(&self) -> bool {
        match self {
            Descriptor::Primitive(_) => false,
            Descriptor::Symbol(_) | Descriptor::Literal(_) | Descriptor::Const(_) => true,
            Descriptor::Value(members) => members.iter().all(Descriptor::is_constant),
            Descriptor::Builtin(b) => b.is_constant(),
        }
    }

    /// Number of physical members of a value type (1 for any other
    /// physical descriptor, 0 for constants).
    pub fn physical_members(&self) -> usize {
        match self {
            Descriptor::Value(members) => members.iter().filter(|m| !m.is_constant()).count(),
            other if other.is_constant() => 0,
            _ => 1,
        }
    }

    /// The single value a constant descriptor stands for.
    ///
    /// Returns [`Value::Unknown`] for physical descriptors.
    pub fn constant_value(&self) -> Value {
        match self {
            Descriptor::Symbol(s) => Value::Symbol(s.clone()),
            Descriptor::Literal(v) => v.clone(),
            Descriptor::Builtin(b) if b.is_constant() => b.constant_value(&[]),
            Descriptor::Const(members) | Descriptor::Value(members) if self.is_constant() => {
                match split_builtin(members) {
                    Some((tag, rest)) => {
                        let literals: Vec<Value> =
                            rest.iter().map(Descriptor::constant_value).collect();
                        BuiltinType::parse(tag, rest).constant_value(&literals)
                    }
                    None => Value::Tuple(members.iter().map(Descriptor::constant_value).collect()),
                }
            }
            _ => Value::Unknown,
        }
    }

    /// The builtin a fully-constant value type encodes, if any.
    pub fn constant_builtin(&self) -> Option<BuiltinType> {
        match self {
            Descriptor::Const(members) | Descriptor::Value(members) if self.is_constant() => {
                split_builtin(members).map(|(tag, rest)| BuiltinType::parse(tag, rest))
            }
            _ => None,
        }
    }

    /// Resolve to the caller-facing type token.
    pub fn resolve(&self) -> ColumnType {
        match self {
            Descriptor::Primitive(p) => ColumnType::from_primitive(*p),
            Descriptor::Symbol(s) => ColumnType::Symbol(s.clone()),
            Descriptor::Builtin(b) => ColumnType::from_builtin(b),
            Descriptor::Value(members) if !self.is_constant() => {
                ColumnType::Value(members.iter().map(Descriptor::resolve).collect())
            }
            Descriptor::Literal(_) | Descriptor::Const(_) | Descriptor::Value(_) => {
                ColumnType::Constant(self.constant_value())
            }
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Primitive(p) => write!(f, "{}", p),
            Descriptor::Symbol(s) => write!(f, ":{}", s),
            Descriptor::Literal(v) => write!(f, "{}", v),
            Descriptor::Builtin(b) => write!(f, "{}", b),
            Descriptor::Const(members) | Descriptor::Value(members) => {
                f.write_str("(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", m)?;
                }
                f.write_str(")")
            }
        }
    }
}

// ── Signature ──────────────────────────────────────────────────────

/// Ordered logical schema of a relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature(Vec<Descriptor>);

impl Signature {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self(descriptors)
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.0.iter()
    }

    /// Number of physical columns a partition must supply for this signature.
    pub fn physical_count(&self) -> usize {
        self.0.iter().filter(|d| !d.is_constant()).count()
    }

    /// Resolve every position to its caller-facing type token.
    pub fn resolve(&self) -> Vec<ColumnType> {
        self.0.iter().map(Descriptor::resolve).collect()
    }
}

impl From<Vec<Descriptor>> for Signature {
    fn from(descriptors: Vec<Descriptor>) -> Self {
        Self(descriptors)
    }
}

/// Renders as a relation path, e.g. `/:output/Int64/String`.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "/{}", d)?;
        }
        Ok(())
    }
}
