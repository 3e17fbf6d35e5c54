//! Type descriptors and the interning arena that owns them.
//!
//! Every type the generator can see lives in a `TypeTable` and is referenced
//! by a `TypeId`. Unnamed types are interned structurally, so two identical
//! anonymous structs share one `TypeId`. Named types are keyed by their
//! `NamedType` (package, name, type arguments) and are declared before they
//! are defined, which is what allows recursive types to be described.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::tag::StructTag;

/// Handle to a descriptor in a `TypeTable`.
///
/// Comparing two handles from the same table compares type identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scalar kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Primitive {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    String,
    /// A point in time. Renderers map it to their date-time type.
    Timestamp,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Timestamp => "Timestamp",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_number(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// String-like scalars (`String`, `char`).
    pub fn is_text(self) -> bool {
        matches!(self, Self::String | Self::Char)
    }
}

/// Nominal identity of a named type.
///
/// `args` holds the type arguments of an instantiated generic type; a
/// non-empty list is what marks the type as generic.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct NamedType {
    pub package: String,
    pub name: String,
    pub args: Vec<TypeId>,
}

impl NamedType {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<TypeId>) -> Self {
        self.args = args;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }
}

/// A struct field, in declaration order.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    /// Visible outside its declaring module.
    pub exported: bool,
    /// Included without an explicit field name; its fields are promoted.
    pub embedded: bool,
    /// Raw annotation text, e.g. `json:"id,omitempty"`.
    pub tag: StructTag,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: true,
            embedded: false,
            tag: StructTag::default(),
        }
    }

    /// An embedded field. By convention its name is the embedded type's name.
    pub fn embedded(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            embedded: true,
            ..Self::new(name, ty)
        }
    }

    pub fn with_tag(mut self, raw: impl Into<String>) -> Self {
        self.tag = StructTag::new(raw);
        self
    }

    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Fields of a struct type.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Find a field by its declared name.
    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

/// The structure of a type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeKind {
    Primitive(Primitive),
    /// Composite type with named fields.
    Struct(StructType),
    /// One level of (nullable) indirection.
    Pointer(TypeId),
    /// Slice (`len: None`) or fixed-size array.
    Sequence { element: TypeId, len: Option<usize> },
    /// Associative map.
    Map { key: TypeId, value: TypeId },
    /// Dynamically typed value.
    Interface,
    /// Function value. No renderer can represent it.
    Func {
        params: Vec<TypeId>,
        results: Vec<TypeId>,
    },
}

impl TypeKind {
    /// Kind classification used in diagnostics.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Struct(_) => "struct",
            Self::Pointer(_) => "pointer",
            Self::Sequence { .. } => "sequence",
            Self::Map { .. } => "map",
            Self::Interface => "interface",
            Self::Func { .. } => "func",
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

/// A type: optional nominal identity plus structure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeDescriptor {
    pub named: Option<NamedType>,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn name(&self) -> Option<&str> {
        self.named.as_ref().map(|n| n.name.as_str())
    }

    pub fn is_generic(&self) -> bool {
        self.named.as_ref().is_some_and(NamedType::is_generic)
    }
}

/// Outcome of declaring a named type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Declared {
    /// Fresh slot; the caller must `define` it.
    New(TypeId),
    /// Already declared (possibly still being defined further up the stack).
    Existing(TypeId),
}

impl Declared {
    pub fn id(self) -> TypeId {
        match self {
            Self::New(id) | Self::Existing(id) => id,
        }
    }
}

/// Arena of type descriptors.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeDescriptor>,
    unnamed: HashMap<TypeKind, TypeId>,
    named: HashMap<NamedType, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an unnamed type. Structurally identical kinds share one id.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.unnamed.get(&kind) {
            return id;
        }

        let id = self.push(TypeDescriptor {
            named: None,
            kind: kind.clone(),
        });
        self.unnamed.insert(kind, id);
        id
    }

    pub fn primitive(&mut self, primitive: Primitive) -> TypeId {
        self.intern(TypeKind::Primitive(primitive))
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer(elem))
    }

    pub fn sequence(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Sequence { element, len: None })
    }

    pub fn array(&mut self, element: TypeId, len: usize) -> TypeId {
        self.intern(TypeKind::Sequence {
            element,
            len: Some(len),
        })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map { key, value })
    }

    pub fn interface(&mut self) -> TypeId {
        self.intern(TypeKind::Interface)
    }

    pub fn func(&mut self, params: Vec<TypeId>, results: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Func { params, results })
    }

    /// Intern an inline (unnamed) struct.
    pub fn anonymous_struct(&mut self, fields: Vec<Field>) -> TypeId {
        self.intern(TypeKind::Struct(StructType::new(fields)))
    }

    /// Reserve a slot for a named type.
    ///
    /// A new slot starts out as an empty struct until `define` fills it in.
    pub fn declare(&mut self, named: NamedType) -> Declared {
        if let Some(&id) = self.named.get(&named) {
            return Declared::Existing(id);
        }

        let id = self.push(TypeDescriptor {
            named: Some(named.clone()),
            kind: TypeKind::Struct(StructType::default()),
        });
        self.named.insert(named, id);
        Declared::New(id)
    }

    /// Set the structure of a declared named type.
    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        self.ensure_named_slot(id).kind = kind;
    }

    /// Declare-then-define a named struct.
    ///
    /// `fields` runs only for a fresh declaration, after the slot is reserved,
    /// so it may describe types that refer back to this one.
    pub fn describe_struct(
        &mut self,
        named: NamedType,
        fields: impl FnOnce(&mut Self) -> Vec<Field>,
    ) -> TypeId {
        self.describe_named(named, |table| {
            TypeKind::Struct(StructType::new(fields(table)))
        })
    }

    /// Declare-then-define a named type of any kind.
    pub fn describe_named(
        &mut self,
        named: NamedType,
        kind: impl FnOnce(&mut Self) -> TypeKind,
    ) -> TypeId {
        match self.declare(named) {
            Declared::Existing(id) => id,
            Declared::New(id) => {
                let kind = kind(self);
                self.define(id, kind);
                id
            }
        }
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeDescriptor> {
        self.types.get_mut(id.index())
    }

    /// Descriptor for an id issued by this table.
    pub fn descriptor(&self, id: TypeId) -> &TypeDescriptor {
        self.ensure_descriptor(id)
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.descriptor(id).kind
    }

    pub fn named(&self, id: TypeId) -> Option<&NamedType> {
        self.descriptor(id).named.as_ref()
    }

    pub fn lookup_named(&self, named: &NamedType) -> Option<TypeId> {
        self.named.get(named).copied()
    }

    pub fn struct_type(&self, id: TypeId) -> Option<&StructType> {
        self.kind(id).as_struct()
    }

    pub fn is_struct(&self, id: TypeId) -> bool {
        self.kind(id).is_struct()
    }

    /// Strip pointer indirection until a non-pointer type is reached.
    ///
    /// `T`, `*T` and `**T` all normalize to `T`.
    pub fn normalize(&self, mut id: TypeId) -> TypeId {
        while let TypeKind::Pointer(elem) = self.kind(id) {
            id = *elem;
        }
        id
    }

    /// Human-readable rendering of a type, for diagnostics.
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_display(id, &mut out);
        out
    }

    fn write_display(&self, id: TypeId, out: &mut String) {
        let descriptor = self.descriptor(id);
        if let Some(named) = &descriptor.named {
            if !named.package.is_empty() {
                out.push_str(&named.package);
                out.push_str("::");
            }
            out.push_str(&named.name);
            if named.is_generic() {
                out.push('<');
                self.write_list(&named.args, out);
                out.push('>');
            }
            return;
        }

        match &descriptor.kind {
            TypeKind::Primitive(p) => out.push_str(p.name()),
            TypeKind::Struct(s) => {
                out.push_str("struct {");
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, " {}: ", field.name);
                    self.write_display(field.ty, out);
                }
                out.push_str(" }");
            }
            TypeKind::Pointer(elem) => {
                out.push('*');
                self.write_display(*elem, out);
            }
            TypeKind::Sequence { element, len } => {
                out.push('[');
                self.write_display(*element, out);
                if let Some(len) = len {
                    let _ = write!(out, "; {len}");
                }
                out.push(']');
            }
            TypeKind::Map { key, value } => {
                out.push_str("Map<");
                self.write_display(*key, out);
                out.push_str(", ");
                self.write_display(*value, out);
                out.push('>');
            }
            TypeKind::Interface => out.push_str("any"),
            TypeKind::Func { params, results } => {
                out.push_str("fn(");
                self.write_list(params, out);
                out.push(')');
                if !results.is_empty() {
                    out.push_str(" -> (");
                    self.write_list(results, out);
                    out.push(')');
                }
            }
        }
    }

    fn write_list(&self, ids: &[TypeId], out: &mut String) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_display(id, out);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, d)| (TypeId(i as u32), d))
    }

    fn push(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(descriptor);
        id
    }
}
