//! Type-signature model: descriptors, builtin tags, resolved type tokens
//! and decoded values.

pub mod primitive;
pub mod value;
pub mod builtin;
pub mod descriptor;
pub mod column_type;

pub use primitive::PrimitiveType;
pub use value::{Decimal, DurationUnit, Rational, Value};
pub use builtin::{BuiltinType, BUILTIN_NAMESPACE};
pub use descriptor::{Descriptor, Signature};
pub use column_type::ColumnType;
