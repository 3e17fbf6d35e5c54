use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::{IndexMap, IndexSet};

use crate::{Describe, Field, NamedType, Primitive, TypeId, TypeKind, TypeTable};

struct Account;

impl Describe for Account {
    fn describe(table: &mut TypeTable) -> TypeId {
        table.describe_struct(NamedType::new("bank", "Account"), |t| {
            vec![
                Field::new("Owner", Option::<Box<Account>>::describe(t)),
                Field::new("Tags", Vec::<String>::describe(t)),
            ]
        })
    }
}

#[test]
fn primitives() {
    let mut table = TypeTable::new();

    let u8_id = u8::describe(&mut table);
    assert_eq!(table.kind(u8_id), &TypeKind::Primitive(Primitive::U8));
    let time_id = SystemTime::describe(&mut table);
    assert_eq!(table.kind(time_id), &TypeKind::Primitive(Primitive::Timestamp));
    assert_eq!(String::describe(&mut table), String::describe(&mut table));
}

#[test]
fn option_is_pointer() {
    let mut table = TypeTable::new();
    let id = Option::<i32>::describe(&mut table);
    let int = i32::describe(&mut table);

    assert_eq!(table.kind(id), &TypeKind::Pointer(int));
    assert_eq!(table.normalize(id), int);
}

#[test]
fn smart_pointers_are_transparent() {
    let mut table = TypeTable::new();
    let string = String::describe(&mut table);

    assert_eq!(Box::<String>::describe(&mut table), string);
    assert_eq!(Rc::<String>::describe(&mut table), string);
    assert_eq!(Arc::<String>::describe(&mut table), string);
}

#[test]
fn sequences() {
    let mut table = TypeTable::new();
    let string = String::describe(&mut table);
    let vec = Vec::<String>::describe(&mut table);

    assert_eq!(VecDeque::<String>::describe(&mut table), vec);
    assert_eq!(HashSet::<String>::describe(&mut table), vec);
    assert_eq!(IndexSet::<String>::describe(&mut table), vec);
    assert_eq!(
        table.kind(vec),
        &TypeKind::Sequence {
            element: string,
            len: None
        }
    );

    let arr = <[String; 3]>::describe(&mut table);
    assert_eq!(
        table.kind(arr),
        &TypeKind::Sequence {
            element: string,
            len: Some(3)
        }
    );
}

#[test]
fn maps() {
    let mut table = TypeTable::new();
    let hash = HashMap::<String, u32>::describe(&mut table);

    assert_eq!(BTreeMap::<String, u32>::describe(&mut table), hash);
    assert_eq!(IndexMap::<String, u32>::describe(&mut table), hash);
    assert_eq!(table.display(hash), "Map<String, u32>");
}

#[test]
fn json_value_is_interface() {
    let mut table = TypeTable::new();
    let id = serde_json::Value::describe(&mut table);

    assert_eq!(table.kind(id), &TypeKind::Interface);
}

#[test]
fn recursive_struct() {
    let mut table = TypeTable::new();
    let account = Account::describe(&mut table);

    assert_eq!(Account::describe(&mut table), account);
    let fields = &table.struct_type(account).unwrap().fields;
    assert_eq!(table.normalize(fields[0].ty), account);
    assert_eq!(table.display(fields[1].ty), "[String]");
}
