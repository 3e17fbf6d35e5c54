//! Schema document construction.

use serde_json::{Map, Value, json};
use typegen_core::{Primitive, TypeId, TypeKind, TypeTable};
use typegen_model::{Declaration, Graph, InterfaceDeclaration, OPTIONAL_FLAGS};

use super::{Config, SchemaTag};
use crate::{RenderError, Result, field_tag};

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// JSON Schema emitter over a declaration graph.
pub struct Emitter<'a> {
    graph: &'a Graph,
    table: &'a TypeTable,
    config: &'a Config,
}

impl<'a> Emitter<'a> {
    pub fn new(graph: &'a Graph, config: &'a Config) -> Self {
        Self {
            graph,
            table: graph.table(),
            config,
        }
    }

    /// One document: every interface under `$defs`, `root` referenced from
    /// the top level.
    pub fn emit(&self, root: TypeId) -> Result<String> {
        let root = self.table.normalize(root);
        let kind = self.table.kind(root);
        if !kind.is_struct() {
            return Err(RenderError::UnsupportedKind {
                ty: self.table.display(root),
                kind: kind.class_name(),
            });
        }
        let Some(root) = self.graph.interface_for(root) else {
            return Err(RenderError::MissingRoot {
                ty: Some(self.table.display(root)),
            });
        };

        let mut defs = Map::new();
        for d in self.graph.iter().filter_map(Declaration::as_interface) {
            let schema = self
                .interface_schema(d)
                .map_err(|e| e.context(format!("interface `{}`", d.identifier)))?;
            defs.insert(d.identifier.clone(), schema);
        }

        tracing::debug!(root = %root.identifier, defs = defs.len(), "built schema document");

        let document = json!({
            "$schema": DRAFT,
            "title": root.identifier,
            "$defs": defs,
            "$ref": reference(&root.identifier),
        });

        let text = if self.config.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    fn interface_schema(&self, d: &InterfaceDeclaration) -> Result<Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for property in &d.properties {
            let field = self.graph.field(property)?;
            let mut identifier = property.identifier.clone();
            let mut optional = property.optional;

            let tag = match field_tag(field, &self.config.tag_key) {
                Some(tag) => {
                    let tag = SchemaTag::from_tag(&tag).map_err(|source| {
                        RenderError::InvalidTagValue {
                            field: field.name.clone(),
                            source,
                        }
                    })?;
                    if tag.skip {
                        continue;
                    }
                    if let Some(name) = &tag.name {
                        identifier = name.clone();
                    }
                    optional |= tag.optional;
                    Some(tag)
                }
                None => {
                    if let Some(fallback) = field_tag(field, &self.config.fallback_tag_key) {
                        if fallback.skip() {
                            continue;
                        }
                        if let Some(name) = fallback.name() {
                            identifier = name.to_string();
                        }
                        optional |= fallback.has_any_flag(OPTIONAL_FLAGS);
                    }
                    None
                }
            };

            if properties.contains_key(&identifier) {
                tracing::trace!(identifier = %identifier, "shadowed by earlier property");
                continue;
            }

            let mut schema = self
                .schema(field.ty)
                .map_err(|e| e.context(format!("property `{identifier}`")))?;
            apply_constraints(&mut schema, optional, tag.as_ref());

            properties.insert(identifier.clone(), Value::Object(schema));
            if !optional {
                required.push(identifier);
            }
        }

        Ok(json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        }))
    }

    /// Schema fragment for a field type.
    fn schema(&self, ty: TypeId) -> Result<Map<String, Value>> {
        let ty = self.table.normalize(ty);
        let mut schema = Map::new();

        match self.table.kind(ty) {
            TypeKind::Primitive(Primitive::Timestamp) => {
                schema.insert("type".into(), "string".into());
                schema.insert("format".into(), "date-time".into());
            }
            TypeKind::Primitive(p) => {
                schema.insert("type".into(), primitive(*p).into());
            }
            TypeKind::Struct(_) => {
                let declaration = self.graph.require(ty)?;
                schema.insert("$ref".into(), reference(declaration.qualified_name()).into());
            }
            TypeKind::Sequence { element, .. } => {
                let element = self.table.normalize(*element);
                if matches!(self.table.kind(element), TypeKind::Primitive(Primitive::U8)) {
                    schema.insert("type".into(), "string".into());
                    schema.insert("contentEncoding".into(), "base64".into());
                } else {
                    schema.insert("type".into(), "array".into());
                    schema.insert("items".into(), Value::Object(self.schema(element)?));
                }
            }
            TypeKind::Map { value, .. } => {
                schema.insert("type".into(), "object".into());
                schema.insert(
                    "additionalProperties".into(),
                    Value::Object(self.schema(*value)?),
                );
            }
            // Any value validates against the empty schema.
            TypeKind::Interface => {}
            TypeKind::Pointer(elem) => return self.schema(*elem),
            kind @ TypeKind::Func { .. } => {
                return Err(RenderError::UnsupportedKind {
                    ty: self.table.display(ty),
                    kind: kind.class_name(),
                });
            }
        }

        Ok(schema)
    }
}

fn reference(identifier: &str) -> String {
    format!("#/$defs/{identifier}")
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Bool => "boolean",
        Primitive::Char | Primitive::String | Primitive::Timestamp => "string",
        p if p.is_float() => "number",
        _ => "integer",
    }
}

/// Required strings get `minLength: 1`; tag constraints apply to the
/// matching schema type only.
fn apply_constraints(schema: &mut Map<String, Value>, optional: bool, tag: Option<&SchemaTag>) {
    let ty = schema
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if ty == "string" && !optional {
        schema.insert("minLength".into(), 1.into());
    }

    let Some(tag) = tag else {
        return;
    };

    if let Some(format) = &tag.format {
        schema.insert("format".into(), format.as_str().into());
    }

    let mut set = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            schema.insert(key.into(), value);
        }
    };
    match ty.as_str() {
        "string" => {
            set("minLength", tag.min_length.map(Value::from));
            set("maxLength", tag.max_length.map(Value::from));
        }
        "number" | "integer" => {
            set("minimum", tag.minimum.clone().map(Value::Number));
            set("maximum", tag.maximum.clone().map(Value::Number));
        }
        "array" => {
            set("minItems", tag.min_items.map(Value::from));
            set("maxItems", tag.max_items.map(Value::from));
        }
        _ => {}
    }
}
