//! JSON Schema (draft 2020-12) documents.
//!
//! Every interface becomes an object schema under `$defs`, closed with
//! `additionalProperties: false`; the root is referenced from the top level.
//! Generic instantiations are separate interfaces, so their fields are
//! already concrete.

mod config;
mod emitter;
mod tag;


pub use config::Config;
pub use emitter::Emitter;
pub use tag::SchemaTag;

use typegen_core::{Describe, TypeId};
use typegen_model::{Builder, Declaration, Graph};

use crate::{RenderError, Renderer, Result};

/// JSON Schema renderer.
#[derive(Clone, Debug, Default)]
pub struct JsonSchema {
    config: Config,
}

impl JsonSchema {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render with `root` as the document's top-level schema.
    pub fn render_root(&self, graph: &Graph, root: TypeId) -> Result<String> {
        Emitter::new(graph, &self.config).emit(root)
    }
}

impl Renderer for JsonSchema {
    /// The root is the last interface in graph order: the one every other
    /// declaration was reached from when a single type was added.
    fn render(&self, graph: &Graph) -> Result<String> {
        let root = graph
            .iter()
            .filter_map(Declaration::as_interface)
            .last()
            .ok_or(RenderError::MissingRoot { ty: None })?;
        self.render_root(graph, root.ty)
    }
}

/// Declare `T` with default settings and render it as the root.
pub fn convert<T: Describe>() -> Result<String> {
    let mut builder = Builder::default();
    let root = builder.describe::<T>();
    builder.add([root])?;
    JsonSchema::default().render_root(&builder.finish()?, root)
}
