//! Runtime values and the symbols that bind them to names.

use std::fmt;
use std::rc::Rc;

use crate::schema::{Array, ArrayRef, RecordKind, RecordRef, TypeTag, new_record};

/// A runtime value. Records and arrays are shared: copying the value aliases
/// the same storage.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    Record(RecordRef),
    /// A record-typed field that was never assigned.
    Unset,
    Array(ArrayRef),
}

impl Value {
    /// Identity for records and arrays, equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => Rc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Unset, Self::Unset) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write_real(f, *v),
            Self::Str(s) => f.write_str(s),
            Self::Unset => f.write_str("<unset>"),
            Self::Array(array) => {
                let array = array.borrow();
                write!(f, "{}[{}]", array.elem, array.len())
            }
            Self::Record(record) => {
                let record = record.borrow();
                let kind = record.kind();
                write!(f, "{kind}{{")?;
                for (i, (field, _)) in kind.schema().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}=")?;
                    match record.load(field) {
                        Some(Value::Str(s)) => write!(f, "{s:?}")?,
                        Some(Value::Record(inner)) => write!(f, "<{}>", inner.borrow().kind())?,
                        Some(other) => write!(f, "{other}")?,
                        None => f.write_str("?")?,
                    }
                }
                f.write_str("}")
            }
        }
    }
}

/// Reals always print with a fractional part so they read back as reals.
fn write_real(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

/// A named, typed binding in a scope.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: TypeTag,
    pub value: Value,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: TypeTag, value: Value) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
        }
    }

    /// Instantiate a declaration: a fresh record, or an empty array when a
    /// dimension marker is present.
    pub fn declare(name: impl Into<String>, kind: RecordKind, dimension: Option<usize>) -> Self {
        let (ty, value) = match dimension {
            None => (TypeTag::Record(kind), Value::Record(new_record(kind))),
            Some(_) => (TypeTag::Array(kind), Value::Array(Array::shared(kind))),
        };
        Self {
            name: name.into(),
            ty,
            value,
        }
    }
}
