//! The finished, read-only declaration graph.

use std::collections::HashMap;

use typegen_core::{Field, TypeId, TypeTable};

use super::{DeclId, Declaration, FieldRef, InterfaceDeclaration, PropertySignature};
use crate::{Error, Result};

/// Declarations in dependency-first order, plus lookup by type.
#[derive(Clone, Debug)]
pub struct Graph {
    table: TypeTable,
    declarations: Vec<Declaration>,
    by_type: HashMap<TypeId, DeclId>,
    order: Vec<DeclId>,
}

impl Graph {
    pub(crate) fn new(
        table: TypeTable,
        declarations: Vec<Declaration>,
        by_type: HashMap<TypeId, DeclId>,
        order: Vec<DeclId>,
    ) -> Self {
        Self {
            table,
            declarations,
            by_type,
            order,
        }
    }

    /// The type table every `TypeId` in this graph belongs to.
    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Declarations in emission order: each after everything it references
    /// (cycles aside).
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.order.iter().map(|&id| &self.declarations[id.index()])
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.order.iter().copied()
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// Declaration of a type, looking through pointers.
    pub fn declaration_for(&self, ty: TypeId) -> Option<&Declaration> {
        let ty = self.table.normalize(ty);
        self.by_type.get(&ty).and_then(|&id| self.get(id))
    }

    /// Like `declaration_for`, but a missing declaration is an error.
    pub fn require(&self, ty: TypeId) -> Result<&Declaration> {
        self.declaration_for(ty)
            .ok_or_else(|| Error::NilDeclaration {
                ty: self.table.display(ty),
            })
    }

    pub fn interface_for(&self, ty: TypeId) -> Option<&InterfaceDeclaration> {
        self.declaration_for(ty).and_then(Declaration::as_interface)
    }

    /// The field a property was built from.
    pub fn field(&self, property: &PropertySignature) -> Result<&Field> {
        let FieldRef { owner, index } = property.field;
        self.table
            .struct_type(owner)
            .and_then(|s| s.fields.get(index))
            .ok_or_else(|| Error::NilField {
                property: property.identifier.clone(),
                owner: self.table.display(owner),
                index,
            })
    }

    /// The concrete type bound to `param`, found by unwrapping its
    /// representative field by its shape.
    ///
    /// A parameter without a representative field falls back to the type's
    /// own argument list. `None` for unknown parameters.
    pub fn type_argument(
        &self,
        interface: &InterfaceDeclaration,
        param: &str,
    ) -> Result<Option<TypeId>> {
        let Some(info) = &interface.generic else {
            return Ok(None);
        };
        let Some(position) = info.param_index(param) else {
            return Ok(None);
        };

        let representative = info
            .representative(param)
            .and_then(|field| Some((field, info.shape_of(field)?)));

        let Some((field_name, shape)) = representative else {
            let args = self.table.named(interface.ty).map(|n| n.args.as_slice());
            return Ok(args.and_then(|args| args.get(position)).copied());
        };

        let field = self
            .table
            .struct_type(interface.ty)
            .and_then(|s| s.field(field_name))
            .map(|(_, f)| f)
            .ok_or_else(|| Error::NoMatchingField {
                ty: self.table.display(interface.ty),
                param: param.to_string(),
                field: field_name.to_string(),
            })?;

        shape
            .kind
            .unwrap(&self.table, field.ty)
            .map(Some)
            .ok_or_else(|| Error::ShapeMismatch {
                ty: self.table.display(interface.ty),
                field: field_name.to_string(),
                shape: shape.kind,
            })
    }

    /// Type arguments of a generic interface, in parameter order.
    pub fn type_arguments(&self, interface: &InterfaceDeclaration) -> Result<Vec<TypeId>> {
        let mut args = Vec::new();
        for param in interface.type_params() {
            if let Some(arg) = self.type_argument(interface, param)? {
                args.push(arg);
            }
        }
        Ok(args)
    }
}
