use std::collections::HashMap;
use std::time::SystemTime;

use typegen_core::{Describe, Field, TypeId, TypeTable};

use super::{Config, Postgres, convert};
use crate::test_utils::{Page, Profile, User, builder, graph_of, graph_with, named_struct};
use crate::{RenderError, Renderer};

fn render(graph: &typegen_model::Graph) -> String {
    Postgres::default().render(graph).unwrap()
}

#[test]
fn profile_and_user() {
    let out = render(&graph_of::<User>());

    insta::assert_snapshot!(out, @r"
    CREATE TABLE profile (
      Bio text NOT NULL,
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );

    CREATE TABLE user (
      ID text NOT NULL,
      profile uuid REFERENCES profile(id),
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );
    ");
}

#[test]
fn convert_uses_default_builder() {
    let out = convert::<User>().unwrap();

    assert_eq!(out, render(&graph_of::<User>()));
}

#[test]
fn column_types() {
    let graph = graph_with(|t| {
        named_struct(t, "Sample", |t| {
            vec![
                Field::new("Flag", bool::describe(t)),
                Field::new("Tiny", i8::describe(t)),
                Field::new("Small", u16::describe(t)),
                Field::new("Count", i32::describe(t)),
                Field::new("Size", usize::describe(t)),
                Field::new("Big", u64::describe(t)),
                Field::new("Ratio", f32::describe(t)),
                Field::new("Score", f64::describe(t)),
                Field::new("Initial", char::describe(t)),
                Field::new("Name", String::describe(t)),
                Field::new("At", SystemTime::describe(t)),
                Field::new("Blob", Vec::<u8>::describe(t)),
                Field::new("Digest", <[u8; 32]>::describe(t)),
                Field::new("Ids", Vec::<i64>::describe(t)),
                Field::new("Grid", Vec::<Vec<f64>>::describe(t)),
                Field::new("Maybe", Option::<i32>::describe(t)).with_tag(r#"json:"maybe,omitempty""#),
            ]
        })
    });

    insta::assert_snapshot!(render(&graph), @r"
    CREATE TABLE sample (
      Flag boolean NOT NULL,
      Tiny smallint NOT NULL,
      Small smallint NOT NULL,
      Count integer NOT NULL,
      Size integer NOT NULL,
      Big bigint NOT NULL,
      Ratio real NOT NULL,
      Score double precision NOT NULL,
      Initial text NOT NULL,
      Name text NOT NULL,
      At timestamptz NOT NULL,
      Blob bytea NOT NULL,
      Digest bytea NOT NULL,
      Ids bigint[] NOT NULL,
      Grid double precision[][] NOT NULL,
      maybe integer,
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );
    ");
}

fn order(t: &mut TypeTable) -> TypeId {
    let customer = named_struct(t, "Customer", |t| vec![Field::new("Name", String::describe(t))]);
    let item = named_struct(t, "LineItem", |t| vec![Field::new("Sku", String::describe(t))]);

    named_struct(t, "PurchaseOrder", |t| {
        let string = String::describe(t);
        let items = t.sequence(item);
        vec![
            Field::new("Number", i64::describe(t)).with_tag(r#"postgres:"number,primarykey""#),
            Field::new("Email", string)
                .with_tag(r#"postgres:"email,unique,indexed,check:length(email) > 3""#),
            Field::new("Customer", customer)
                .with_tag(r#"postgres:"customer_id,onupdate:NO ACTION,ondelete:CASCADE""#),
            Field::new("Items", items),
            Field::new("Placed", SystemTime::describe(t))
                .with_tag(r#"postgres:"placed_at,default:now()""#),
            Field::new("Total", f64::describe(t))
                .with_tag(r#"postgres:",type:numeric(10, 2),default:0""#),
            Field::new("Region", string).with_tag(r#"postgres:"region,uniquecomposite""#),
            Field::new("Code", string).with_tag(r#"postgres:"code,UniqueComposite,Indexed""#),
            Field::new("Note", string).with_tag(r#"postgres:",nullable""#),
            Field::new("Search", string)
                .with_tag(r#"postgres:"search,generatedstored:lower(email),ondelete:CASCADE""#),
            Field::new("Secret", string).with_tag(r#"postgres:"-""#),
        ]
    })
}

#[test]
fn column_options() {
    insta::assert_snapshot!(render(&graph_with(order)), @r"
    CREATE TABLE customer (
      Name text NOT NULL,
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );

    CREATE TABLE line_item (
      Sku text NOT NULL,
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );

    CREATE TABLE purchase_order (
      number bigint PRIMARY KEY NOT NULL,
      email text UNIQUE CHECK (length(email) > 3) NOT NULL,
      customer_id uuid REFERENCES customer(id) ON UPDATE NO ACTION ON DELETE CASCADE NOT NULL,
      placed_at timestamptz DEFAULT now() NOT NULL,
      Total numeric(10, 2) DEFAULT 0 NOT NULL,
      region text NOT NULL,
      code text NOT NULL,
      Note text,
      search text GENERATED ALWAYS AS (lower(email)) STORED NOT NULL,
      UNIQUE (region, code)
    );

    CREATE TABLE purchase_order_line_item (
      purchase_order_id uuid NOT NULL REFERENCES purchase_order(id) ON DELETE CASCADE,
      line_item_id uuid NOT NULL REFERENCES line_item(id) ON DELETE CASCADE,
      PRIMARY KEY (purchase_order_id, line_item_id)
    );

    CREATE INDEX purchase_order_email_idx ON purchase_order(email);

    CREATE INDEX purchase_order_code_idx ON purchase_order(code);
    ");
}

#[test]
fn without_surrogate_key() {
    let out = Postgres::new(Config::new().surrogate_key(false))
        .render(&graph_of::<Profile>())
        .unwrap();

    insta::assert_snapshot!(out, @r"
    CREATE TABLE profile (
      Bio text NOT NULL
    );
    ");
}

#[test]
fn custom_tag_key() {
    let graph = graph_with(|t| {
        named_struct(t, "Device", |t| {
            vec![Field::new("Serial", String::describe(t)).with_tag(r#"db:"serial,unique""#)]
        })
    });

    let out = Postgres::new(Config::new().tag_key("db")).render(&graph).unwrap();

    insta::assert_snapshot!(out, @r"
    CREATE TABLE device (
      serial text UNIQUE NOT NULL,
      id uuid PRIMARY KEY DEFAULT gen_random_uuid()
    );
    ");
}

#[test]
fn generated_column() {
    let graph = graph_with(|t| {
        named_struct(t, "Box", |t| {
            vec![
                Field::new("Width", i32::describe(t)),
                Field::new("Area", i32::describe(t))
                    .with_tag(r#"postgres:"area,generated:Width * Width""#),
            ]
        })
    });

    let out = render(&graph);

    assert!(out.contains("  area integer GENERATED ALWAYS AS (Width * Width) NOT NULL,\n"));
}

#[test]
fn skipped_sequence_has_no_join_table() {
    let graph = graph_with(|t| {
        named_struct(t, "Team", |t| {
            vec![Field::new("Members", Vec::<Profile>::describe(t)).with_tag(r#"postgres:"-""#)]
        })
    });

    let out = render(&graph);

    assert!(!out.contains("team_profile"));
    assert!(out.contains("CREATE TABLE team (\n  id uuid PRIMARY KEY DEFAULT gen_random_uuid()\n);"));
}

#[test]
fn empty_graph() {
    let graph = builder().finish().unwrap();

    assert_eq!(render(&graph), "");
}

#[test]
fn generic_interface_is_rejected() {
    let err = Postgres::default()
        .render(&graph_of::<Page<Profile>>())
        .unwrap_err();

    assert!(matches!(err.root(), RenderError::GenericTypesUnsupported { ty } if ty == "app::Page<app::Profile>"));
    assert_eq!(
        err.to_string(),
        "interface `Page`: generic type `app::Page<app::Profile>` cannot be rendered as a table"
    );
}

#[test]
fn maps_have_no_column_type() {
    let graph = graph_with(|t| {
        named_struct(t, "Settings", |t| {
            vec![Field::new("Values", HashMap::<String, String>::describe(t))]
        })
    });

    let err = Postgres::default().render(&graph).unwrap_err();

    assert_eq!(
        err.to_string(),
        "interface `Settings`: property `Values`: unsupported map type `Map<String, String>`"
    );
}

#[test]
fn nested_struct_sequences_are_unsupported() {
    let graph = graph_with(|t| {
        named_struct(t, "Board", |t| {
            vec![Field::new("Rows", Vec::<Vec<Profile>>::describe(t))]
        })
    });

    let err = Postgres::default().render(&graph).unwrap_err();

    assert!(matches!(
        err.root(),
        RenderError::UnsupportedKind { kind: "sequence", .. }
    ));
}
