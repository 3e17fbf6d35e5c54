//! TypeScript type expressions.

use std::fmt;

/// A TypeScript type as it appears on the right of a property or alias.
#[derive(Clone, PartialEq, Debug)]
pub(super) enum TsType {
    Basic(&'static str),
    /// A type parameter of the enclosing interface.
    Param(String),
    Reference {
        name: String,
        args: Vec<TsType>,
    },
    Array(Box<TsType>),
    /// Index signature. A parameter index renders as `Record<K, V>`.
    Map {
        index: Box<TsType>,
        value: Box<TsType>,
    },
}

pub(super) const BOOLEAN: TsType = TsType::Basic("boolean");
pub(super) const NUMBER: TsType = TsType::Basic("number");
pub(super) const STRING: TsType = TsType::Basic("string");
pub(super) const ANY: TsType = TsType::Basic("any");

impl TsType {
    pub(super) fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(name) => f.write_str(name),
            Self::Param(name) => f.write_str(name),
            Self::Reference { name, args } => {
                f.write_str(name)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Array(items) => write!(f, "{items}[]"),
            Self::Map { index, value } => match index.as_ref() {
                Self::Param(param) => write!(f, "Record<{param}, {value}>"),
                index => write!(f, "{{ [key: {index}]: {value} }}"),
            },
        }
    }
}
