//! Data types and analysis-time values

use std::fmt;

/// Data types of the Aula language.
///
/// `Bool` only arises from relational and logical expressions; the surface
/// grammar has no boolean declarations. A node whose type could not be
/// established carries `Option::<Type>::None` instead, which always means
/// an error was already reported for that subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Str,
    Bool,
}

impl Type {
    /// Assignment compatibility: identical types, or int widening to float.
    pub fn accepts(self, source: Type) -> bool {
        self == source || (self == Type::Float && source == Type::Int)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Surface keyword names, as they appear in diagnostics
        let name = match self {
            Type::Int => "ent",
            Type::Float => "dec",
            Type::Str => "cadena",
            Type::Bool => "bool",
        };
        write!(f, "{name}")
    }
}

/// A literal value known at analysis time.
///
/// Present on an expression node only when every input to the expression
/// was itself a statically known literal (a "folded value").
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Str(_) => Type::Str,
            Value::Bool(_) => Type::Bool,
        }
    }

    /// Numeric content widened to f64, if this is a numeric value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "\"{v}\""),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}
