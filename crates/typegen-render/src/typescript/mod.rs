//! TypeScript declarations.
//!
//! Interfaces become `export interface Name<T> { ... }` and aliases
//! `export type Name = ...;`, in graph order. Generic interfaces are declared
//! once per instantiation with their parameters in place, and references pass
//! the concrete type arguments.

mod config;
mod emitter;
mod types;

#[cfg(test)]
mod emitter_tests;

pub use config::Config;
pub use emitter::Emitter;

use typegen_core::Describe;
use typegen_model::{Builder, Graph};

use crate::{Renderer, Result};

/// TypeScript renderer.
#[derive(Clone, Debug, Default)]
pub struct TypeScript {
    config: Config,
}

impl TypeScript {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Renderer for TypeScript {
    fn render(&self, graph: &Graph) -> Result<String> {
        Emitter::new(graph, self.config.clone()).emit()
    }
}

/// Declare `T` with default settings and render it.
pub fn convert<T: Describe>() -> Result<String> {
    let mut builder = Builder::default();
    builder.add_type::<T>()?;
    TypeScript::default().render(&builder.finish()?)
}
