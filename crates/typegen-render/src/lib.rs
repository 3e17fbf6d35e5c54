//! Renderers over a finished declaration graph.
//!
//! Each renderer reads the `Graph` and never changes it:
//! - `typescript` - `export interface` / `export type` declarations
//! - `jsonschema` - one draft 2020-12 document with every interface under `$defs`
//! - `postgres` - `CREATE TABLE` statements with references and indices
//!
//! Every renderer maps scalars to its own vocabulary and reads its own tag key
//! on top of the naming tag the graph was built with.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
pub mod jsonschema;
pub mod postgres;
pub mod typescript;

#[cfg(test)]
mod test_utils;

pub use error::{RenderError, Result};

use typegen_core::{Field, FieldTag};
use typegen_model::Graph;

/// Turns a declaration graph into target-format text.
pub trait Renderer {
    fn render(&self, graph: &Graph) -> Result<String>;
}

/// The field's tag value under `key`, parsed. Blank or absent is `None`.
pub(crate) fn field_tag(field: &Field, key: &str) -> Option<FieldTag> {
    field.tag.get(key).and_then(|raw| FieldTag::parse(&raw))
}
