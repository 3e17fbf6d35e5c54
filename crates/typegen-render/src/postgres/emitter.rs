//! Table definitions from interface declarations.

use std::fmt;

use typegen_core::utils::to_snake_case;
use typegen_core::{Primitive, TypeId, TypeKind, TypeTable};
use typegen_model::{Declaration, Graph, InterfaceDeclaration};

use super::{ColumnTag, Config};
use crate::{RenderError, Result, field_tag};

const SURROGATE_KEY: &str = "id uuid PRIMARY KEY DEFAULT gen_random_uuid()";

/// What a field becomes in its table.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ColumnType {
    /// A plain column type: `text`, `bigint[]`, ...
    Sql(String),
    /// `uuid REFERENCES <table>(id)`
    Reference(String),
    /// Not a column: a join table between the owner and `<table>`.
    Associative(String),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(ty) => f.write_str(ty),
            Self::Reference(table) => write!(f, "uuid REFERENCES {table}(id)"),
            Self::Associative(table) => write!(f, "{table}[]"),
        }
    }
}

/// Table name of an interface.
pub fn table_name(d: &InterfaceDeclaration) -> String {
    to_snake_case(&d.identifier)
}

/// PostgreSQL emitter over a declaration graph.
pub struct Emitter<'a> {
    graph: &'a Graph,
    table: &'a TypeTable,
    config: &'a Config,
    /// Output buffer
    output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(graph: &'a Graph, config: &'a Config) -> Self {
        Self {
            graph,
            table: graph.table(),
            config,
            output: String::new(),
        }
    }

    /// One `CREATE TABLE` per interface in graph order, each followed by its
    /// join tables and indices.
    pub fn emit(mut self) -> Result<String> {
        let graph = self.graph;
        for d in graph.iter().filter_map(Declaration::as_interface) {
            let statements = self
                .interface_statements(d)
                .map_err(|e| e.context(format!("interface `{}`", d.identifier)))?;
            self.output.push_str(&statements.join("\n\n"));
            self.output.push_str("\n\n");
        }

        // Exactly one trailing newline, none for an empty graph
        self.output.truncate(self.output.trim_end().len());
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        Ok(self.output)
    }

    fn interface_statements(&self, d: &InterfaceDeclaration) -> Result<Vec<String>> {
        if d.generic.is_some() {
            return Err(RenderError::GenericTypesUnsupported {
                ty: self.table.display(d.ty),
            });
        }

        let table = table_name(d);
        let mut columns = Vec::new();
        let mut unique_composite = Vec::new();
        let mut associative = Vec::new();
        let mut indices = Vec::new();
        let mut primary_key = false;

        for property in &d.properties {
            let field = self.graph.field(property)?;
            let tag = field_tag(field, &self.config.tag_key)
                .map(|tag| ColumnTag::from(&tag))
                .unwrap_or_default();
            if tag.skip {
                tracing::trace!(field = %field.name, "skipped column");
                continue;
            }

            let column_type = self
                .column_type(field.ty)
                .map_err(|e| e.context(format!("property `{}`", property.identifier)))?;

            if let ColumnType::Associative(target) = &column_type {
                associative.push(associative_table(&table, target));
                continue;
            }

            let identifier = tag.name.clone().unwrap_or_else(|| property.identifier.clone());
            let optional = property.optional || tag.nullable;

            if tag.unique_composite {
                unique_composite.push(identifier.clone());
            }
            if tag.indexed {
                indices.push(format!(
                    "CREATE INDEX {table}_{identifier}_idx ON {table}({identifier});"
                ));
            }
            primary_key |= tag.primary_key;

            let mut attrs = attributes(&tag, &column_type);
            if !optional {
                attrs.push("NOT NULL".to_string());
            }

            let sql_type = tag.sql_type.unwrap_or_else(|| column_type.to_string());
            let mut column = format!("{identifier} {sql_type}");
            for attr in attrs {
                column.push(' ');
                column.push_str(&attr);
            }
            columns.push(column);
        }

        if !unique_composite.is_empty() {
            columns.push(format!("UNIQUE ({})", unique_composite.join(", ")));
        }
        if !primary_key && self.config.surrogate_key {
            columns.push(SURROGATE_KEY.to_string());
        }

        tracing::debug!(
            table = %table,
            columns = columns.len(),
            join_tables = associative.len(),
            "built table"
        );

        let mut statements = vec![create_table(&table, &columns)];
        statements.extend(associative);
        statements.extend(indices);
        Ok(statements)
    }

    fn column_type(&self, ty: TypeId) -> Result<ColumnType> {
        let ty = self.table.normalize(ty);

        match self.table.kind(ty) {
            TypeKind::Primitive(p) => Ok(ColumnType::Sql(primitive(*p).to_string())),
            kind @ TypeKind::Struct(_) => match self.graph.require(ty)? {
                Declaration::Interface(d) if d.generic.is_some() => {
                    Err(RenderError::GenericTypesUnsupported {
                        ty: self.table.display(ty),
                    })
                }
                Declaration::Interface(d) => Ok(ColumnType::Reference(table_name(d))),
                Declaration::TypeAlias(_) => Err(self.unsupported(ty, kind)),
            },
            kind @ TypeKind::Sequence { element, .. } => {
                let element = self.table.normalize(*element);
                if matches!(self.table.kind(element), TypeKind::Primitive(Primitive::U8)) {
                    return Ok(ColumnType::Sql("bytea".to_string()));
                }
                match self.column_type(element)? {
                    ColumnType::Reference(target) => Ok(ColumnType::Associative(target)),
                    ColumnType::Sql(item) => Ok(ColumnType::Sql(format!("{item}[]"))),
                    ColumnType::Associative(_) => Err(self.unsupported(ty, kind)),
                }
            }
            kind => Err(self.unsupported(ty, kind)),
        }
    }

    fn unsupported(&self, ty: TypeId, kind: &TypeKind) -> RenderError {
        RenderError::UnsupportedKind {
            ty: self.table.display(ty),
            kind: kind.class_name(),
        }
    }
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Bool => "boolean",
        Primitive::I8 | Primitive::U8 | Primitive::I16 | Primitive::U16 => "smallint",
        Primitive::I32 | Primitive::U32 | Primitive::Isize | Primitive::Usize => "integer",
        Primitive::I64 | Primitive::U64 => "bigint",
        Primitive::F32 => "real",
        Primitive::F64 => "double precision",
        Primitive::Char | Primitive::String => "text",
        Primitive::Timestamp => "timestamptz",
    }
}

/// Column attributes in emission order, `NOT NULL` excluded.
fn attributes(tag: &ColumnTag, column_type: &ColumnType) -> Vec<String> {
    let mut out = Vec::new();
    if tag.primary_key {
        out.push("PRIMARY KEY".to_string());
    }
    if matches!(column_type, ColumnType::Reference(_)) {
        if let Some(action) = &tag.on_update {
            out.push(format!("ON UPDATE {action}"));
        }
        if let Some(action) = &tag.on_delete {
            out.push(format!("ON DELETE {action}"));
        }
    }
    if let Some(default) = &tag.default {
        out.push(format!("DEFAULT {default}"));
    }
    if tag.unique {
        out.push("UNIQUE".to_string());
    }
    if let Some(expr) = &tag.generated {
        out.push(format!("GENERATED ALWAYS AS ({expr})"));
    }
    if let Some(expr) = &tag.generated_stored {
        out.push(format!("GENERATED ALWAYS AS ({expr}) STORED"));
    }
    if let Some(expr) = &tag.check {
        out.push(format!("CHECK ({expr})"));
    }
    out
}

fn create_table(name: &str, columns: &[String]) -> String {
    let mut out = format!("CREATE TABLE {name} (\n");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str("  ");
        out.push_str(column);
    }
    out.push_str("\n);");
    out
}

/// Join table `<source>_<target>` keyed by both ids.
fn associative_table(source: &str, target: &str) -> String {
    let columns: Vec<String> = [source, target]
        .iter()
        .map(|name| {
            format!("{name}_id uuid NOT NULL REFERENCES {name}(id) ON DELETE CASCADE")
        })
        .chain(std::iter::once(format!(
            "PRIMARY KEY ({source}_id, {target}_id)"
        )))
        .collect();
    create_table(&format!("{source}_{target}"), &columns)
}
