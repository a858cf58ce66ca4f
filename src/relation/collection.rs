//! Relation sets and signature-prefix lookup.

use std::fmt;
use std::sync::Arc;

use super::Relation;
use crate::types::{ColumnType, Value};

/// One position of a signature prefix query.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Matches anything.
    Any,
    /// Matches a symbol (or string constant) with this name, or a type
    /// whose display name is this string.
    Symbol(String),
    /// Matches a position of exactly this type.
    Type(ColumnType),
    /// Matches a constant position carrying this value.
    Value(Value),
}

impl Term {
    /// Parse a textual term. `wildcard` becomes [`Term::Any`]; a leading
    /// `:` is stripped from symbol names.
    pub fn parse(s: &str, wildcard: &str) -> Self {
        if s == wildcard {
            return Term::Any;
        }
        Term::Symbol(s.strip_prefix(':').unwrap_or(s).to_string())
    }

    pub fn matches(&self, t: &ColumnType) -> bool {
        match self {
            Term::Any => true,
            Term::Symbol(name) => match t {
                ColumnType::Symbol(s) => s == name,
                ColumnType::Constant(Value::Symbol(s) | Value::String(s)) => s == name,
                other => other.to_string() == *name,
            },
            Term::Type(want) => want == t,
            Term::Value(v) => match t {
                ColumnType::Constant(c) => c == v,
                ColumnType::Symbol(s) => matches!(v, Value::Symbol(x) if x == s),
                _ => false,
            },
        }
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::parse(s, "_")
    }
}

impl From<ColumnType> for Term {
    fn from(t: ColumnType) -> Self {
        Term::Type(t)
    }
}

impl From<Value> for Term {
    fn from(v: Value) -> Self {
        Term::Value(v)
    }
}

/// Whether `signature` starts with `prefix`, position by position.
pub fn prefix_matches(signature: &[ColumnType], prefix: &[Term]) -> bool {
    prefix.len() <= signature.len()
        && prefix.iter().zip(signature).all(|(term, t)| term.matches(t))
}

/// Ordered set of relations from one transaction result.
#[derive(Debug, Clone, Default)]
pub struct RelationCollection {
    relations: Vec<Arc<Relation>>,
}

impl RelationCollection {
    pub fn new(relations: Vec<Arc<Relation>>) -> Self {
        Self { relations }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Relation>> {
        self.relations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Relation>> {
        self.relations.iter()
    }

    /// Relations whose resolved signature starts with `prefix`. An empty
    /// prefix selects everything.
    pub fn select(&self, prefix: &[Term]) -> RelationCollection {
        let relations: Vec<Arc<Relation>> = self
            .relations
            .iter()
            .filter(|r| prefix_matches(r.signature(), prefix))
            .cloned()
            .collect();
        tracing::trace!(
            terms = prefix.len(),
            selected = relations.len(),
            of = self.relations.len(),
            "Selected relations by prefix"
        );
        RelationCollection { relations }
    }

    /// Collapse the whole set into one relation.
    pub fn union(&self) -> Relation {
        Relation::union(&self.relations)
    }
}

impl<'a> IntoIterator for &'a RelationCollection {
    type Item = &'a Arc<Relation>;
    type IntoIter = std::slice::Iter<'a, Arc<Relation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

impl fmt::Display for RelationCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.relations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", r)?;
        }
        Ok(())
    }
}
