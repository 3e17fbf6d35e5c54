//! Test fixtures and graph dumps.

use std::collections::HashMap;
use std::fmt::Write as _;

use typegen_core::{Describe, Field, NamedType, TypeId, TypeKind, TypeTable};

use crate::shape::{GenericShapeInfo, ShapeError, ShapeLocator, ShapeResolver, TypeExpr};
use crate::{Builder, Declaration, Graph};

pub struct Profile;

impl Describe for Profile {
    fn describe(table: &mut TypeTable) -> TypeId {
        table.describe_struct(NamedType::new("app", "Profile"), |t| {
            vec![Field::new("Bio", String::describe(t))]
        })
    }
}

pub struct User;

impl Describe for User {
    fn describe(table: &mut TypeTable) -> TypeId {
        table.describe_struct(NamedType::new("app", "User"), |t| {
            vec![
                Field::new("ID", String::describe(t)),
                Field::new("Profile", Option::<Profile>::describe(t))
                    .with_tag(r#"json:"profile,optional""#),
            ]
        })
    }
}

/// `Page<T> { Value: T, Items: Vec<T>, ByKey: Map<String, T>, KeyedBy: Map<T, String> }`
pub struct Page<T>(std::marker::PhantomData<T>);

impl<T: Describe> Describe for Page<T> {
    fn describe(table: &mut TypeTable) -> TypeId {
        let arg = T::describe(table);
        table.describe_struct(NamedType::new("app", "Page").with_args(vec![arg]), |t| {
            let items = t.sequence(arg);
            let string = String::describe(t);
            let by_key = t.map(string, arg);
            let keyed_by = t.map(arg, string);
            vec![
                Field::new("Value", arg),
                Field::new("Items", items),
                Field::new("ByKey", by_key),
                Field::new("KeyedBy", keyed_by),
            ]
        })
    }
}

/// `Id<T> { Raw: u64 }`: a typed id whose parameter no field mentions.
pub struct Id<T>(std::marker::PhantomData<T>);

impl<T: Describe> Describe for Id<T> {
    fn describe(table: &mut TypeTable) -> TypeId {
        let arg = T::describe(table);
        table.describe_struct(NamedType::new("app", "Id").with_args(vec![arg]), |t| {
            vec![Field::new("Raw", u64::describe(t))]
        })
    }
}

/// Shape info for `Id<T>`.
pub fn id_shape() -> GenericShapeInfo {
    GenericShapeInfo::from_fields(
        vec!["T".to_string()],
        [("Raw".to_string(), TypeExpr::ident("u64"))],
    )
}

/// Shape info for `Page<T>`, as a locator would report it.
pub fn page_shape() -> GenericShapeInfo {
    let t = || TypeExpr::ident("T");
    let string = || TypeExpr::ident("String");
    GenericShapeInfo::from_fields(
        vec!["T".to_string()],
        [
            ("Value".to_string(), t()),
            ("Items".to_string(), TypeExpr::sequence(t())),
            ("ByKey".to_string(), TypeExpr::map(string(), t())),
            ("KeyedBy".to_string(), TypeExpr::map(t(), string())),
        ],
    )
}

/// Locator answering from a fixed map of type names.
#[derive(Default)]
pub struct StaticLocator {
    shapes: HashMap<String, GenericShapeInfo>,
}

impl StaticLocator {
    pub fn with(mut self, name: &str, info: GenericShapeInfo) -> Self {
        self.shapes.insert(name.to_string(), info);
        self
    }
}

impl ShapeLocator for StaticLocator {
    fn name(&self) -> &str {
        "static"
    }

    fn locate(&self, ty: &NamedType) -> Result<Option<GenericShapeInfo>, ShapeError> {
        Ok(self.shapes.get(&ty.name).cloned())
    }
}

/// Locator that always fails.
pub struct BrokenLocator;

impl ShapeLocator for BrokenLocator {
    fn name(&self) -> &str {
        "broken"
    }

    fn locate(&self, ty: &NamedType) -> Result<Option<GenericShapeInfo>, ShapeError> {
        Err(ShapeError::NilScope {
            package: ty.package.clone(),
        })
    }
}

/// A builder that resolves shapes only through `locator`.
pub fn builder_with(locator: impl ShapeLocator + 'static) -> Builder {
    Builder::default().with_resolver(ShapeResolver::empty().with_locator(locator))
}

/// A builder whose resolver knows nothing.
pub fn builder() -> Builder {
    Builder::default().with_resolver(ShapeResolver::empty())
}

/// Textual dump of a graph, one declaration per block.
pub fn dump(graph: &Graph) -> String {
    let table = graph.table();
    let mut out = String::new();

    for declaration in graph.iter() {
        match declaration {
            Declaration::Interface(d) => {
                out.push_str("interface ");
                out.push_str(&d.identifier);
                if !d.type_params().is_empty() {
                    let _ = write!(out, "<{}>", d.type_params().join(", "));
                }
                out.push('\n');
                for property in &d.properties {
                    let field = graph.field(property).expect("property field");
                    let marker = if property.optional { "?" } else { "" };
                    let _ = writeln!(
                        out,
                        "  {}{}: {}",
                        property.identifier,
                        marker,
                        table.display(field.ty)
                    );
                }
            }
            Declaration::TypeAlias(d) => {
                let _ = writeln!(
                    out,
                    "alias {} = {}",
                    d.identifier,
                    display_kind(table, d.ty)
                );
            }
        }
    }

    out
}

/// Display an alias body structurally rather than by its own name.
fn display_kind(table: &TypeTable, ty: TypeId) -> String {
    match table.kind(ty) {
        TypeKind::Sequence { element, .. } => format!("[{}]", table.display(*element)),
        TypeKind::Map { key, value } => {
            format!("Map<{}, {}>", table.display(*key), table.display(*value))
        }
        TypeKind::Primitive(p) => p.name().to_string(),
        kind => kind.class_name().to_string(),
    }
}
