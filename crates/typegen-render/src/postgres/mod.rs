//! PostgreSQL table definitions.
//!
//! Every non-generic interface becomes a `CREATE TABLE` named after its
//! identifier in snake case. Struct fields reference the other table by
//! `uuid`; sequences of structs become join tables. Column details come from
//! the `postgres` tag (see [`ColumnTag`]).

mod config;
mod emitter;
mod tag;

#[cfg(test)]
mod emitter_tests;

pub use config::Config;
pub use emitter::{Emitter, table_name};
pub use tag::ColumnTag;

use typegen_core::Describe;
use typegen_model::{Builder, Graph};

use crate::{Renderer, Result};

/// PostgreSQL renderer.
#[derive(Clone, Debug, Default)]
pub struct Postgres {
    config: Config,
}

impl Postgres {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Renderer for Postgres {
    fn render(&self, graph: &Graph) -> Result<String> {
        Emitter::new(graph, &self.config).emit()
    }
}

/// Declare `T` with default settings and render every table it reaches.
pub fn convert<T: Describe>() -> Result<String> {
    let mut builder = Builder::default();
    builder.add_type::<T>()?;
    Postgres::default().render(&builder.finish()?)
}
