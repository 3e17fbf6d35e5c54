//! Fixtures shared by renderer tests.

use indoc::indoc;
use typegen_core::{Describe, Field, NamedType, TypeId, TypeTable};
use typegen_model::{Builder, Graph, ShapeResolver, SymbolTableLocator};

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

/// Symbol index declaring `app.Page[T]` and `app.Id[T]`.
const SYMBOLS: &str = indoc! {r#"
    {
      "packages": {
        "app": {
          "scope": {
            "objects": {
              "Page": {
                "kind": "type_name",
                "type": {
                  "kind": "named",
                  "name": "Page",
                  "type_params": ["T"],
                  "underlying": {
                    "kind": "struct",
                    "fields": [
                      { "name": "Value", "type": { "kind": "param", "name": "T" } },
                      { "name": "Items", "type": { "kind": "slice", "elem": { "kind": "param", "name": "T" } } },
                      { "name": "ByKey", "type": { "kind": "map", "key": { "kind": "basic", "name": "string" }, "value": { "kind": "param", "name": "T" } } },
                      { "name": "KeyedBy", "type": { "kind": "map", "key": { "kind": "param", "name": "T" }, "value": { "kind": "basic", "name": "string" } } }
                    ]
                  }
                }
              },
              "Id": {
                "kind": "type_name",
                "type": {
                  "kind": "named",
                  "name": "Id",
                  "type_params": ["T"],
                  "underlying": {
                    "kind": "struct",
                    "fields": [
                      { "name": "Raw", "type": { "kind": "basic", "name": "uint64" } }
                    ]
                  }
                }
              }
            }
          }
        }
      }
    }
"#};

/// A builder that resolves generic shapes from `SYMBOLS` only.
pub fn builder() -> Builder {
    let locator = SymbolTableLocator::from_json(SYMBOLS).expect("fixture symbol index");
    Builder::default().with_resolver(ShapeResolver::empty().with_locator(locator))
}

pub fn graph_of<T: Describe>() -> Graph {
    let mut builder = builder();
    builder.add_type::<T>().expect("add");
    builder.finish().expect("finish")
}

/// Graph of an ad-hoc type described straight into the builder's table.
pub fn graph_with(describe: impl FnOnce(&mut TypeTable) -> TypeId) -> Graph {
    let mut builder = builder();
    let ty = describe(builder.table_mut());
    builder.add([ty]).expect("add");
    builder.finish().expect("finish")
}

/// `app::<name>` with the given fields.
pub fn named_struct(
    table: &mut TypeTable,
    name: &str,
    fields: impl FnOnce(&mut TypeTable) -> Vec<Field>,
) -> TypeId {
    table.describe_struct(NamedType::new("app", name), fields)
}
