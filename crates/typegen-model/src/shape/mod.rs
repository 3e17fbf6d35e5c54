//! Generic shape resolution.
//!
//! A generic struct's descriptor only carries its concrete type arguments.
//! To know *where* each type parameter sits among the fields, the struct's
//! declaration is read statically. Two locators do that, tried in order:
//!
//! - `SourceTreeLocator` parses the program's own `.rs` files
//! - `SymbolTableLocator` reads a serialized symbol index of compiled packages
//!
//! Both lower their own type representation into `TypeExpr` and share
//! `detect_shape`, so they match fields identically.

mod error;
mod expr;
mod resolver;
mod source_tree;
mod symbol_table;


use std::fmt;

use indexmap::IndexMap;
use typegen_core::{TypeId, TypeKind, TypeTable};

pub use error::ShapeError;
pub use expr::{TypeExpr, detect_shape};
pub use resolver::{ShapeLocator, ShapeResolver};
pub use source_tree::SourceTreeLocator;
pub use symbol_table::{
    Object, Package, ResolvedType, Scope, SymbolField, SymbolIndex, SymbolTableLocator,
};

/// How a type parameter appears inside a field's type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShapeKind {
    /// `T`
    Direct,
    /// `Option<T>`, `*const T`
    Pointer,
    /// `Vec<T>`, `[T; N]`
    Sequence,
    /// `HashMap<K, T>`
    MapValue,
    /// `HashMap<T, V>`
    MapKey,
}

impl ShapeKind {
    /// Peel one layer off a concrete field type, yielding the type bound to
    /// the parameter. `None` when the field does not have this shape.
    pub fn unwrap(self, table: &TypeTable, ty: TypeId) -> Option<TypeId> {
        match (self, table.kind(ty)) {
            (Self::Direct, _) => Some(ty),
            (Self::Pointer, TypeKind::Pointer(elem)) => Some(*elem),
            (Self::Sequence, TypeKind::Sequence { element, .. }) => Some(*element),
            (Self::MapValue, TypeKind::Map { value, .. }) => Some(*value),
            (Self::MapKey, TypeKind::Map { key, .. }) => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Pointer => "pointer",
            Self::Sequence => "sequence",
            Self::MapValue => "map value",
            Self::MapKey => "map key",
        };
        f.write_str(name)
    }
}

/// A parameter and the position it occupies in one field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    pub param: String,
    pub kind: ShapeKind,
}

/// Where the type parameters of one generic struct appear.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GenericShapeInfo {
    /// Declared parameter names, in order.
    pub type_params: Vec<String>,
    /// Field name to the shape it carries. Fields without a parameter are absent.
    pub field_shapes: IndexMap<String, Shape>,
    /// Parameter name to the first field carrying it.
    pub param_fields: IndexMap<String, String>,
}

impl GenericShapeInfo {
    /// Match each field against the parameters, in declaration order.
    ///
    /// The first field found for a parameter becomes its representative.
    pub fn from_fields<I>(type_params: Vec<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, TypeExpr)>,
    {
        let mut info = Self {
            type_params,
            ..Self::default()
        };

        for (name, expr) in fields {
            let Some(shape) = detect_shape(&expr, &info.type_params) else {
                continue;
            };
            info.param_fields
                .entry(shape.param.clone())
                .or_insert_with(|| name.clone());
            info.field_shapes.insert(name, shape);
        }

        info
    }

    pub fn shape_of(&self, field: &str) -> Option<&Shape> {
        self.field_shapes.get(field)
    }

    pub fn representative(&self, param: &str) -> Option<&str> {
        self.param_fields.get(param).map(String::as_str)
    }

    pub fn param_index(&self, param: &str) -> Option<usize> {
        self.type_params.iter().position(|p| p == param)
    }
}
