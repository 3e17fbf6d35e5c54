//! How Rust types write themselves into a `TypeTable`.
//!
//! Implement `Describe` for a user struct with `TypeTable::describe_struct`.
//! Each field is named by the PascalCase form of its Rust identifier
//! (`utils::to_pascal_case`); the source-tree shape locator keys generic
//! fields the same way.
//!
//! ```
//! use typegen_core::{Describe, Field, NamedType, TypeId, TypeTable};
//!
//! struct Node {
//!     value: String,
//!     next: Option<Box<Node>>,
//! }
//!
//! impl Describe for Node {
//!     fn describe(table: &mut TypeTable) -> TypeId {
//!         table.describe_struct(NamedType::new("app", "Node"), |t| {
//!             vec![
//!                 Field::new("Value", String::describe(t)),
//!                 Field::new("Next", Option::<Box<Node>>::describe(t)),
//!             ]
//!         })
//!     }
//! }
//!
//! let mut table = TypeTable::new();
//! let node = Node::describe(&mut table);
//! assert_eq!(table.display(node), "app::Node");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::{IndexMap, IndexSet};

use crate::{Primitive, TypeId, TypeTable};

/// A type that can describe itself into a `TypeTable`.
pub trait Describe {
    fn describe(table: &mut TypeTable) -> TypeId;
}

macro_rules! describe_primitive {
    ($($ty:ty => $prim:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(table: &mut TypeTable) -> TypeId {
                    table.primitive(Primitive::$prim)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    SystemTime => Timestamp,
}

/// Nullable indirection.
impl<T: Describe> Describe for Option<T> {
    fn describe(table: &mut TypeTable) -> TypeId {
        let elem = T::describe(table);
        table.pointer(elem)
    }
}

macro_rules! describe_transparent {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Describe> Describe for $wrapper<T> {
                fn describe(table: &mut TypeTable) -> TypeId {
                    T::describe(table)
                }
            }
        )*
    };
}

describe_transparent!(Box, Rc, Arc);

macro_rules! describe_sequence {
    ($($seq:ident $(, $s:ident)?);* $(;)?) => {
        $(
            impl<T: Describe $(, $s)?> Describe for $seq<T $(, $s)?> {
                fn describe(table: &mut TypeTable) -> TypeId {
                    let element = T::describe(table);
                    table.sequence(element)
                }
            }
        )*
    };
}

describe_sequence! {
    Vec;
    VecDeque;
    BTreeSet;
    HashSet, S;
    IndexSet, S;
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(table: &mut TypeTable) -> TypeId {
        let element = T::describe(table);
        table.array(element, N)
    }
}

macro_rules! describe_map {
    ($($map:ident $(, $s:ident)?);* $(;)?) => {
        $(
            impl<K: Describe, V: Describe $(, $s)?> Describe for $map<K, V $(, $s)?> {
                fn describe(table: &mut TypeTable) -> TypeId {
                    let key = K::describe(table);
                    let value = V::describe(table);
                    table.map(key, value)
                }
            }
        )*
    };
}

describe_map! {
    BTreeMap;
    HashMap, S;
    IndexMap, S;
}

impl Describe for serde_json::Value {
    fn describe(table: &mut TypeTable) -> TypeId {
        table.interface()
    }
}
