//! Declaration graph construction.
//!
//! This crate turns described types into a deduplicated, dependency-ordered
//! graph of declarations that renderers consume:
//! - `shape` - which fields of a generic struct carry which type parameter, and how
//! - `declare` - the `Builder` that walks types and the finished `Graph`

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod declare;
mod error;
mod invariants;
pub mod shape;

#[cfg(test)]
pub mod test_utils;

pub use declare::{
    Builder, Config, DeclId, Declaration, FieldRef, Graph, InterfaceDeclaration, OPTIONAL_FLAGS,
    PropertySignature, TypeAliasDeclaration,
};
pub use error::{Error, Result, ResultExt};
pub use shape::{
    GenericShapeInfo, Shape, ShapeError, ShapeKind, ShapeLocator, ShapeResolver,
    SourceTreeLocator, SymbolTableLocator,
};
