use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

use typegen_core::{Describe, Field, NamedType, Primitive, TypeKind};

use super::{Config, TypeScript, convert};
use crate::test_utils::{Id, Page, Profile, User, builder, graph_of, graph_with, named_struct};
use crate::{RenderError, Renderer};

fn render(graph: &typegen_model::Graph) -> String {
    TypeScript::default().render(graph).unwrap()
}

#[test]
fn profile_and_user() {
    let out = render(&graph_of::<User>());

    insta::assert_snapshot!(out, @r"
    export interface Profile {
      Bio: string;
    }

    export interface User {
      ID: string;
      profile?: Profile;
    }
    ");
}

#[test]
fn convert_uses_default_builder() {
    let out = convert::<User>().unwrap();

    assert_eq!(out, render(&graph_of::<User>()));
}

#[test]
fn scalars_and_containers() {
    let graph = graph_with(|t| {
        named_struct(t, "Scalars", |t| {
            vec![
                Field::new("Flag", bool::describe(t)),
                Field::new("Count", i32::describe(t)),
                Field::new("Ratio", f64::describe(t)),
                Field::new("Initial", char::describe(t)),
                Field::new("Name", String::describe(t)),
                Field::new("At", SystemTime::describe(t)),
                Field::new("Extra", serde_json::Value::describe(t)),
                Field::new("Tags", Vec::<String>::describe(t)),
                Field::new("Grid", Vec::<Vec<u8>>::describe(t)),
                Field::new("Flags", HashMap::<String, bool>::describe(t)),
                Field::new("ById", BTreeMap::<u32, Option<String>>::describe(t)),
            ]
        })
    });

    insta::assert_snapshot!(render(&graph), @r"
    export interface Scalars {
      Flag: boolean;
      Count: number;
      Ratio: number;
      Initial: string;
      Name: string;
      At: string;
      Extra: any;
      Tags: string[];
      Grid: number[][];
      Flags: { [key: string]: boolean };
      ById: { [key: number]: string };
    }
    ");
}

#[test]
fn empty_interface() {
    let graph = graph_with(|t| named_struct(t, "Empty", |_| Vec::new()));

    insta::assert_snapshot!(render(&graph), @"export interface Empty {}");
}

#[test]
fn empty_graph() {
    let graph = builder().finish().unwrap();

    assert_eq!(render(&graph), "");
}

#[test]
fn without_export() {
    let out = TypeScript::new(Config::new().export(false))
        .render(&graph_of::<Profile>())
        .unwrap();

    insta::assert_snapshot!(out, @r"
    interface Profile {
      Bio: string;
    }
    ");
}

fn account(t: &mut typegen_core::TypeTable) -> typegen_core::TypeId {
    named_struct(t, "Account", |t| {
        let string = String::describe(t);
        let user_id = t.describe_named(NamedType::new("app", "UserId"), |_| {
            TypeKind::Primitive(Primitive::String)
        });
        let tags = t.describe_named(NamedType::new("app", "Tags"), |_| TypeKind::Sequence {
            element: string,
            len: None,
        });
        let owners = t.map(user_id, string);
        vec![
            Field::new("ID", user_id),
            Field::new("Tags", tags),
            Field::new("Owners", owners),
        ]
    })
}

#[test]
fn named_types_become_aliases() {
    let graph = graph_with(account);

    insta::assert_snapshot!(render(&graph), @r"
    export type UserId = string;

    export type Tags = string[];

    export interface Account {
      ID: UserId;
      Tags: Tags;
      Owners: { [key: string]: string };
    }
    ");
}

#[test]
fn nominal_aliases_are_branded() {
    let graph = graph_with(|t| {
        named_struct(t, "Session", |t| {
            let user_id = t.describe_named(NamedType::new("app", "UserId"), |_| {
                TypeKind::Primitive(Primitive::String)
            });
            vec![Field::new("User", user_id)]
        })
    });

    let out = TypeScript::new(Config::new().nominal_aliases(true))
        .render(&graph)
        .unwrap();

    insta::assert_snapshot!(out, @r"
    export type UserId = string & {
      /**
       * WARNING: Do not reference this field from application code.
       *
       * This field exists solely to provide nominal typing. For reference, see
       * https://www.typescriptlang.org/play#example/nominal-typing.
       */
      _userIdbrand: 'type alias for string';
    };

    export function UserId(v: string): UserId {
      return v as UserId;
    }

    export interface Session {
      User: UserId;
    }
    ");
}

#[test]
fn generic_interface_keeps_its_parameters() {
    let graph = graph_with(|t| {
        named_struct(t, "Holder", |t| {
            vec![Field::new("Page", Page::<Profile>::describe(t))]
        })
    });

    insta::assert_snapshot!(render(&graph), @r"
    export interface Profile {
      Bio: string;
    }

    export interface Page<T> {
      Value: T;
      Items: T[];
      ByKey: { [key: string]: T };
      KeyedBy: Record<T, string>;
    }

    export interface Holder {
      Page: Page<Profile>;
    }
    ");
}

#[test]
fn parameter_without_field_renders_its_argument() {
    let graph = graph_with(|t| {
        named_struct(t, "Order", |t| {
            vec![Field::new("Owner", Id::<Profile>::describe(t))]
        })
    });

    insta::assert_snapshot!(render(&graph), @r"
    export interface Profile {
      Bio: string;
    }

    export interface Id<T> {
      Raw: number;
    }

    export interface Order {
      Owner: Id<Profile>;
    }
    ");
}

#[test]
fn each_instantiation_is_declared() {
    let graph = graph_with(|t| {
        named_struct(t, "Holder", |t| {
            vec![
                Field::new("Profiles", Page::<Profile>::describe(t)),
                Field::new("Counts", Option::<Page<i64>>::describe(t)).with_tag(r#"json:",omitempty""#),
            ]
        })
    });

    let out = render(&graph);

    assert!(out.contains("export interface Page2<T> {"));
    assert!(out.ends_with(indoc::indoc! {"
        export interface Holder {
          Profiles: Page<Profile>;
          Counts?: Page2<number>;
        }
    "}));
}

#[test]
fn map_key_must_be_string_or_number() {
    let graph = graph_with(|t| {
        named_struct(t, "Lookup", |t| {
            let flags = HashMap::<bool, String>::describe(t);
            vec![Field::new("ByFlag", flags)]
        })
    });

    let err = TypeScript::default().render(&graph).unwrap_err();

    assert!(matches!(err.root(), RenderError::UnsupportedIndexType { ty } if ty == "bool"));
    assert_eq!(
        err.to_string(),
        "interface `Lookup`: property `ByFlag`: unsupported index type `bool`"
    );
}
