#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for typegen.
//!
//! Three layers:
//! - **Descriptors** (`TypeTable`, `TypeId`, `TypeKind`): an arena describing the
//!   program's types, interned so that a `TypeId` is a canonical map key
//! - **Description** (`Describe`): how Rust types write themselves into the arena
//! - **Annotations** (`StructTag`, `FieldTag`): the raw per-field tag text and
//!   the shared element grammar renderers layer their vocabulary on

mod describe;
mod descriptor;
mod invariants;
pub mod tag;
pub mod utils;

#[cfg(test)]
mod describe_tests;

pub use describe::Describe;
pub use descriptor::{
    Declared, Field, NamedType, Primitive, StructType, TypeDescriptor, TypeId, TypeKind,
    TypeTable,
};
pub use tag::{FieldTag, StructTag, TagOption};
