//! The declaration graph builder.

use std::collections::{HashMap, HashSet};

use typegen_core::utils::title_case;
use typegen_core::{Describe, Field, FieldTag, TypeId, TypeKind, TypeTable};

use super::config::OPTIONAL_FLAGS;
use super::{
    Config, DeclId, Declaration, FieldRef, Graph, InterfaceDeclaration, PropertySignature,
    TypeAliasDeclaration,
};
use crate::shape::{GenericShapeInfo, ShapeResolver};
use crate::{Error, Result, ResultExt};

/// Whether properties reached through a nilable embedding are forced optional.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum OptionalPolicy {
    Force,
    Keep,
}

/// Walks types and collects one declaration per distinct struct or named type.
///
/// A declaration is registered, with its identifier, before its properties
/// are populated. Revisiting a type while it is being populated returns the
/// registered declaration, which is what terminates recursive type graphs.
/// Declarations enter the ordered output only once populated, so every
/// declaration follows the ones it depends on.
///
/// One builder serves one generation run.
pub struct Builder {
    table: TypeTable,
    resolver: ShapeResolver,
    config: Config,

    declarations: Vec<Declaration>,
    /// Normalized type -> its declaration
    by_type: HashMap<TypeId, DeclId>,
    /// Populated declarations, dependency-first
    order: Vec<DeclId>,
    /// Identifiers already handed out
    used_names: HashSet<String>,
    anonymous_count: usize,
    failed: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(TypeTable::new())
    }
}

impl Builder {
    pub fn new(table: TypeTable) -> Self {
        Self {
            table,
            resolver: ShapeResolver::default(),
            config: Config::default(),
            declarations: Vec::new(),
            by_type: HashMap::new(),
            order: Vec::new(),
            used_names: HashSet::new(),
            anonymous_count: 0,
            failed: false,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_resolver(mut self, resolver: ShapeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TypeTable {
        &mut self.table
    }

    /// Describe `T` into this builder's table.
    pub fn describe<T: Describe>(&mut self) -> TypeId {
        T::describe(&mut self.table)
    }

    /// Declare every given type and everything it references.
    ///
    /// Stops at the first error. After a failure the builder only yields
    /// `Error::IncompleteGraph`.
    pub fn add(&mut self, types: impl IntoIterator<Item = TypeId>) -> Result<()> {
        if self.failed {
            return Err(Error::IncompleteGraph);
        }

        for ty in types {
            self.get_or_create_interface(ty)?;
        }
        Ok(())
    }

    pub fn add_type<T: Describe>(&mut self) -> Result<()> {
        let ty = self.describe::<T>();
        self.add([ty])
    }

    /// Declare the type of `value`.
    pub fn add_value<T: Describe>(&mut self, _value: &T) -> Result<()> {
        self.add_type::<T>()
    }

    /// The interface declaration for a struct type, created on first use.
    ///
    /// While a declaration is being populated this returns it as is, with
    /// its identifier assigned and its property list still growing.
    pub fn get_or_create_interface(&mut self, ty: TypeId) -> Result<DeclId> {
        let result = self.interface(ty);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn interface(&mut self, ty: TypeId) -> Result<DeclId> {
        let ty = self.table.normalize(ty);
        if let Some(&id) = self.by_type.get(&ty) {
            return Ok(id);
        }

        self.create_interface(ty)
            .with_context(|| format!("declare `{}`", self.table.display(ty)))
    }

    fn create_interface(&mut self, ty: TypeId) -> Result<DeclId> {
        let descriptor = self.table.descriptor(ty);
        if !descriptor.kind.is_struct() {
            return Err(Error::NotAStruct {
                ty: self.table.display(ty),
                kind: descriptor.kind.class_name(),
            });
        }

        let name = descriptor.name().filter(|n| !n.is_empty()).map(title_case);
        let is_generic = descriptor.is_generic();
        let base = match name {
            Some(name) => name,
            None => self.anonymous_name(),
        };
        let identifier = self.unique_name(&base);

        tracing::debug!(identifier = %identifier, ty = %self.table.display(ty), "declaring interface");

        let id = self.push(Declaration::Interface(InterfaceDeclaration {
            identifier,
            ty,
            properties: Vec::new(),
            generic: None,
        }));
        self.by_type.insert(ty, id);

        if is_generic {
            let info = self.resolver.resolve(&self.table, ty)?;
            self.ensure_interface_mut(id).generic = Some(info.clone());
            self.declare_type_arguments(ty, &info)?;
        }

        let mut properties = Vec::new();
        let mut embedding = vec![ty];
        self.populate(ty, &mut properties, OptionalPolicy::Keep, &mut embedding)?;
        self.ensure_interface_mut(id).properties = properties;

        self.order.push(id);
        Ok(id)
    }

    /// Declare what each type parameter is bound to, found through its
    /// representative field.
    ///
    /// A parameter no field mentions is bound positionally from the type's
    /// own argument list, the same way `Graph::type_argument` reads it back.
    fn declare_type_arguments(&mut self, ty: TypeId, info: &GenericShapeInfo) -> Result<()> {
        for (position, param) in info.type_params.iter().enumerate() {
            let representative = info
                .representative(param)
                .and_then(|field| Some((field, info.shape_of(field)?)));

            let Some((field_name, shape)) = representative else {
                let arg = self
                    .table
                    .named(ty)
                    .and_then(|named| named.args.get(position).copied());
                if let Some(arg) = arg {
                    tracing::trace!(param = %param, arg = %self.table.display(arg), "positional type argument");
                    self.declare_references(arg)
                        .with_context(|| format!("type parameter `{param}`"))?;
                }
                continue;
            };

            let Some((_, field)) = self
                .table
                .struct_type(ty)
                .and_then(|s| s.field(field_name))
            else {
                return Err(Error::NoMatchingField {
                    ty: self.table.display(ty),
                    param: param.clone(),
                    field: field_name.to_string(),
                });
            };

            let Some(arg) = shape.kind.unwrap(&self.table, field.ty) else {
                return Err(Error::ShapeMismatch {
                    ty: self.table.display(ty),
                    field: field_name.to_string(),
                    shape: shape.kind,
                });
            };

            tracing::trace!(param = %param, arg = %self.table.display(arg), "type argument");
            self.declare_references(arg)
                .with_context(|| format!("type parameter `{param}`"))?;
        }
        Ok(())
    }

    /// Collect properties of `owner` into `properties`.
    ///
    /// Own fields come first and embedded structs last, so an identifier the
    /// outer struct already has shadows one surfaced through embedding.
    fn populate(
        &mut self,
        owner: TypeId,
        properties: &mut Vec<PropertySignature>,
        policy: OptionalPolicy,
        embedding: &mut Vec<TypeId>,
    ) -> Result<()> {
        let fields: Vec<Field> = self
            .table
            .struct_type(owner)
            .map(|s| s.fields.clone())
            .unwrap_or_default();

        let mut embedded = Vec::new();

        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() || !field.exported {
                tracing::trace!(field = %field.name, "skipping unexported field");
                continue;
            }

            if field.embedded && self.table.is_struct(self.table.normalize(field.ty)) {
                embedded.push(field);
                continue;
            }

            let mut identifier = field.name.clone();
            let mut optional = false;
            if let Some(tag) = field
                .tag
                .get(&self.config.tag_key)
                .and_then(|raw| FieldTag::parse(&raw))
            {
                if tag.skip() {
                    tracing::trace!(field = %field.name, "skipped by tag");
                    continue;
                }
                if let Some(name) = tag.name() {
                    identifier = name.to_string();
                }
                optional = tag.has_any_flag(OPTIONAL_FLAGS);
            }

            if properties.iter().any(|p| p.identifier == identifier) {
                tracing::trace!(identifier = %identifier, "shadowed by earlier property");
                continue;
            }

            self.declare_references(field.ty)
                .with_context(|| format!("field `{}`", field.name))?;

            properties.push(PropertySignature {
                identifier,
                field: FieldRef { owner, index },
                optional: policy == OptionalPolicy::Force || optional,
            });
        }

        for field in embedded {
            let target = self.table.normalize(field.ty);
            if embedding.contains(&target) {
                tracing::trace!(field = %field.name, "embedding cycle");
                continue;
            }

            let nilable = matches!(self.table.kind(field.ty), TypeKind::Pointer(_));
            let policy = if policy == OptionalPolicy::Force || nilable {
                OptionalPolicy::Force
            } else {
                OptionalPolicy::Keep
            };

            embedding.push(target);
            self.populate(target, properties, policy, embedding)
                .with_context(|| format!("embedded `{}`", field.name))?;
            embedding.pop();
        }

        Ok(())
    }

    /// Ensure declarations for every struct or named type reachable from
    /// `ty` through pointers, sequences and maps.
    fn declare_references(&mut self, ty: TypeId) -> Result<()> {
        let ty = self.table.normalize(ty);
        if self.by_type.contains_key(&ty) {
            return Ok(());
        }

        let descriptor = self.table.descriptor(ty);
        let (kind, name) = match &descriptor.kind {
            TypeKind::Struct(_) => return self.interface(ty).map(|_| ()),
            TypeKind::Func { .. } => {
                return Err(Error::UnsupportedKind {
                    ty: self.table.display(ty),
                    kind: descriptor.kind.class_name(),
                });
            }
            kind => (kind.clone(), descriptor.name().map(str::to_string)),
        };

        // Named non-struct types are reserved before their elements are visited.
        let alias = name.map(|name| self.reserve_alias(ty, name));

        match kind {
            TypeKind::Sequence { element, .. } => self.declare_references(element)?,
            TypeKind::Map { key, value } => {
                self.declare_references(key)?;
                self.declare_references(value)?;
            }
            _ => {}
        }

        if let Some(id) = alias {
            self.order.push(id);
        }
        Ok(())
    }

    fn reserve_alias(&mut self, ty: TypeId, name: String) -> DeclId {
        let base = if name.is_empty() {
            self.anonymous_name()
        } else {
            title_case(&name)
        };
        let identifier = self.unique_name(&base);

        tracing::debug!(identifier = %identifier, ty = %self.table.display(ty), "declaring alias");

        let id = self.push(Declaration::TypeAlias(TypeAliasDeclaration {
            identifier,
            type_params: Vec::new(),
            ty,
        }));
        self.by_type.insert(ty, id);
        id
    }

    /// Hand out `base`, or `base2`, `base3`, ... if taken.
    fn unique_name(&mut self, base: &str) -> String {
        if self.used_names.insert(base.to_string()) {
            return base.to_string();
        }

        let mut counter = 2;
        loop {
            let name = format!("{}{}", base, counter);
            if self.used_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }

    pub(crate) fn declaration_mut(&mut self, id: DeclId) -> Option<&mut Declaration> {
        self.declarations.get_mut(id.index())
    }

    fn anonymous_name(&mut self) -> String {
        self.anonymous_count += 1;
        format!("Anonymous{}", self.anonymous_count)
    }

    fn push(&mut self, declaration: Declaration) -> DeclId {
        let id = DeclId::from_index(self.declarations.len());
        self.declarations.push(declaration);
        id
    }

    /// The finished graph, or `IncompleteGraph` if any `add` failed.
    pub fn finish(self) -> Result<Graph> {
        if self.failed {
            return Err(Error::IncompleteGraph);
        }

        Ok(Graph::new(
            self.table,
            self.declarations,
            self.by_type,
            self.order,
        ))
    }
}
