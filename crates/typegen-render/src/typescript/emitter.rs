//! Core emitter struct and main emit logic.

use typegen_core::{Field, Primitive, TypeId, TypeKind, TypeTable};
use typegen_model::{
    Declaration, Graph, InterfaceDeclaration, PropertySignature, ShapeKind, TypeAliasDeclaration,
};

use super::Config;
use super::types::{ANY, BOOLEAN, NUMBER, STRING, TsType};
use crate::{RenderError, Result};

/// TypeScript emitter over a declaration graph.
pub struct Emitter<'a> {
    graph: &'a Graph,
    table: &'a TypeTable,
    config: Config,
    /// Output buffer
    output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(graph: &'a Graph, config: Config) -> Self {
        Self {
            graph,
            table: graph.table(),
            config,
            output: String::new(),
        }
    }

    /// Emit every declaration in graph order.
    pub fn emit(mut self) -> Result<String> {
        let graph = self.graph;
        for declaration in graph.iter() {
            match declaration {
                Declaration::Interface(d) => self
                    .emit_interface(d)
                    .map_err(|e| e.context(format!("interface `{}`", d.identifier)))?,
                Declaration::TypeAlias(d) => self
                    .emit_alias(d)
                    .map_err(|e| e.context(format!("type alias `{}`", d.identifier)))?,
            }
        }

        // Exactly one trailing newline, none for an empty graph
        self.output.truncate(self.output.trim_end().len());
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        Ok(self.output)
    }

    fn export(&self) -> &'static str {
        if self.config.export { "export " } else { "" }
    }

    fn emit_interface(&mut self, d: &InterfaceDeclaration) -> Result<()> {
        tracing::trace!(identifier = %d.identifier, "emitting interface");

        let mut body = String::new();
        for property in &d.properties {
            let field = self.graph.field(property)?;
            let ty = self
                .property_type(d, property, field)
                .map_err(|e| e.context(format!("property `{}`", property.identifier)))?;
            let optional = if property.optional { "?" } else { "" };
            body.push_str(&format!("  {}{}: {};\n", property.identifier, optional, ty));
        }

        let header = format!(
            "{}interface {}{}",
            self.export(),
            d.identifier,
            type_params(d.type_params())
        );
        if body.is_empty() {
            self.output.push_str(&format!("{header} {{}}\n\n"));
        } else {
            self.output.push_str(&format!("{header} {{\n{body}}}\n\n"));
        }
        Ok(())
    }

    fn emit_alias(&mut self, d: &TypeAliasDeclaration) -> Result<()> {
        tracing::trace!(identifier = %d.identifier, "emitting type alias");

        let body = self.body_type(d.ty)?;
        let name = format!("{}{}", d.identifier, type_params(&d.type_params));
        let export = self.export();

        if !self.config.nominal_aliases {
            self.output
                .push_str(&format!("{export}type {name} = {body};\n\n"));
            return Ok(());
        }

        self.output.push_str(&format!(
            "{export}type {name} = {body} & {{\n  \
            /**\n   \
            * WARNING: Do not reference this field from application code.\n   \
            *\n   \
            * This field exists solely to provide nominal typing. For reference, see\n   \
            * https://www.typescriptlang.org/play#example/nominal-typing.\n   \
            */\n  \
            _{brand}brand: 'type alias for {body}';\n\
            }};\n\n\
            {export}function {name}(v: {body}): {name} {{\n  \
            return v as {name};\n\
            }}\n\n",
            brand = lower_first(&d.identifier),
        ));
        Ok(())
    }

    /// Type of a property. Fields of a generic interface that carry a type
    /// parameter render with the parameter in place of the concrete type.
    fn property_type(
        &self,
        d: &InterfaceDeclaration,
        property: &PropertySignature,
        field: &Field,
    ) -> Result<TsType> {
        let shape = d
            .generic
            .as_ref()
            .filter(|_| property.field.owner == d.ty)
            .and_then(|info| info.shape_of(&field.name));
        let Some(shape) = shape else {
            return self.ts_type(field.ty);
        };

        let param = TsType::Param(shape.param.clone());
        let ty = match shape.kind {
            ShapeKind::Direct | ShapeKind::Pointer => param,
            ShapeKind::Sequence => TsType::Array(Box::new(param)),
            ShapeKind::MapValue | ShapeKind::MapKey => {
                let TypeKind::Map { key, value } = self.table.kind(self.table.normalize(field.ty))
                else {
                    return Err(typegen_model::Error::ShapeMismatch {
                        ty: self.table.display(d.ty),
                        field: field.name.clone(),
                        shape: shape.kind,
                    }
                    .into());
                };
                if shape.kind == ShapeKind::MapValue {
                    TsType::Map {
                        index: Box::new(self.index_type(*key)?),
                        value: Box::new(param),
                    }
                } else {
                    TsType::Map {
                        index: Box::new(param),
                        value: Box::new(self.ts_type(*value)?),
                    }
                }
            }
        };
        Ok(ty)
    }

    /// Type used where `ty` is referenced. Named non-struct types refer to
    /// their alias declaration.
    fn ts_type(&self, ty: TypeId) -> Result<TsType> {
        let ty = self.table.normalize(ty);
        let descriptor = self.table.descriptor(ty);
        if descriptor.named.is_some() && !descriptor.kind.is_struct() {
            let declaration = self.graph.require(ty)?;
            return Ok(TsType::reference(declaration.qualified_name()));
        }
        self.body_type(ty)
    }

    /// Structural type of `ty`, ignoring its own name.
    fn body_type(&self, ty: TypeId) -> Result<TsType> {
        match self.table.kind(ty) {
            TypeKind::Primitive(p) => Ok(primitive(*p)),
            TypeKind::Struct(_) => match self.graph.require(ty)? {
                Declaration::Interface(d) => {
                    let args = self
                        .graph
                        .type_arguments(d)?
                        .into_iter()
                        .map(|arg| self.ts_type(arg))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(TsType::Reference {
                        name: d.identifier.clone(),
                        args,
                    })
                }
                Declaration::TypeAlias(d) => Ok(TsType::reference(d.qualified_name())),
            },
            TypeKind::Pointer(elem) => self.ts_type(*elem),
            TypeKind::Sequence { element, .. } => Ok(TsType::Array(Box::new(self.ts_type(*element)?))),
            TypeKind::Map { key, value } => Ok(TsType::Map {
                index: Box::new(self.index_type(*key)?),
                value: Box::new(self.ts_type(*value)?),
            }),
            TypeKind::Interface => Ok(ANY),
            kind @ TypeKind::Func { .. } => Err(RenderError::UnsupportedKind {
                ty: self.table.display(ty),
                kind: kind.class_name(),
            }),
        }
    }

    /// Index signature parameter for a map key.
    ///
    /// Only `string` and `number` are allowed there, and never through an
    /// alias, so named keys use their underlying scalar.
    fn index_type(&self, key: TypeId) -> Result<TsType> {
        let key = self.table.normalize(key);
        match self.table.kind(key) {
            TypeKind::Primitive(p) if p.is_text() => Ok(STRING),
            TypeKind::Primitive(p) if p.is_number() => Ok(NUMBER),
            _ => Err(RenderError::UnsupportedIndexType {
                ty: self.table.display(key),
            }),
        }
    }
}

fn primitive(p: Primitive) -> TsType {
    match p {
        Primitive::Bool => BOOLEAN,
        Primitive::Char | Primitive::String | Primitive::Timestamp => STRING,
        _ => NUMBER,
    }
}

fn type_params(params: &[String]) -> String {
    if params.is_empty() {
        return String::new();
    }
    format!("<{}>", params.join(", "))
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
