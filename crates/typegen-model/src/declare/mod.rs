//! Declaration graph: what renderers see.
//!
//! A `Builder` walks described types and produces one `Declaration` per
//! distinct struct (interface) or named non-struct type (alias). The finished
//! `Graph` lists them dependency-first.

mod builder;
mod config;
mod graph;


use typegen_core::TypeId;

use crate::shape::GenericShapeInfo;

pub use builder::Builder;
pub use config::{Config, OPTIONAL_FLAGS};
pub use graph::Graph;

/// Index of a declaration in its graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DeclId(u32);

impl DeclId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Points at a field of a struct type: `owner`'s field number `index`.
///
/// For properties surfaced through embedding, `owner` is the embedded struct.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FieldRef {
    pub owner: TypeId,
    pub index: usize,
}

/// One property of an interface.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PropertySignature {
    /// Name after tag renaming.
    pub identifier: String,
    pub field: FieldRef,
    pub optional: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceDeclaration {
    pub identifier: String,
    /// The struct this declares.
    pub ty: TypeId,
    pub properties: Vec<PropertySignature>,
    /// Present for generic structs.
    pub generic: Option<GenericShapeInfo>,
}

impl InterfaceDeclaration {
    pub fn qualified_name(&self) -> &str {
        &self.identifier
    }

    pub fn type_params(&self) -> &[String] {
        self.generic
            .as_ref()
            .map(|info| info.type_params.as_slice())
            .unwrap_or_default()
    }

    pub fn property(&self, identifier: &str) -> Option<&PropertySignature> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }
}

/// A named non-struct type: a newtype over a scalar, a named sequence or map.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeAliasDeclaration {
    pub identifier: String,
    pub type_params: Vec<String>,
    /// The named type itself; its kind is the alias body.
    pub ty: TypeId,
}

impl TypeAliasDeclaration {
    pub fn qualified_name(&self) -> &str {
        &self.identifier
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Declaration {
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
}

impl Declaration {
    /// Name other declarations use to refer to this one.
    pub fn qualified_name(&self) -> &str {
        match self {
            Self::Interface(d) => d.qualified_name(),
            Self::TypeAlias(d) => d.qualified_name(),
        }
    }

    pub fn ty(&self) -> TypeId {
        match self {
            Self::Interface(d) => d.ty,
            Self::TypeAlias(d) => d.ty,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDeclaration> {
        match self {
            Self::Interface(d) => Some(d),
            Self::TypeAlias(_) => None,
        }
    }

    pub fn as_alias(&self) -> Option<&TypeAliasDeclaration> {
        match self {
            Self::TypeAlias(d) => Some(d),
            Self::Interface(_) => None,
        }
    }
}
