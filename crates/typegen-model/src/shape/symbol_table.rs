//! Shape lookup in a serialized symbol index of compiled packages.
//!
//! The index mirrors a type checker's export data:
//!
//! ```json
//! {
//!   "packages": {
//!     "shop": {
//!       "scope": {
//!         "objects": {
//!           "Page": {
//!             "kind": "type_name",
//!             "type": {
//!               "kind": "named",
//!               "name": "Page",
//!               "type_params": ["T"],
//!               "underlying": {
//!                 "kind": "struct",
//!                 "fields": [{ "name": "items", "type": { "kind": "slice", "elem": { "kind": "param", "name": "T" } } }]
//!               }
//!             }
//!           }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use typegen_core::NamedType;

use super::{GenericShapeInfo, ShapeError, ShapeLocator, TypeExpr};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolIndex {
    #[serde(default)]
    pub packages: IndexMap<String, Option<Package>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub scope: Option<Scope>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default)]
    pub objects: IndexMap<String, Object>,
}

/// A package-level object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Object {
    TypeName {
        #[serde(rename = "type")]
        ty: ResolvedType,
    },
    Const,
    Var,
    Func,
}

impl Object {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::TypeName { .. } => "type name",
            Self::Const => "const",
            Self::Var => "var",
            Self::Func => "func",
        }
    }
}

/// A type as the type checker resolved it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedType {
    /// Reference to a type parameter of the enclosing declaration.
    Param {
        name: String,
    },
    Basic {
        name: String,
    },
    Named {
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        args: Vec<ResolvedType>,
        #[serde(default)]
        underlying: Option<Box<ResolvedType>>,
    },
    Pointer {
        elem: Box<ResolvedType>,
    },
    Slice {
        elem: Box<ResolvedType>,
    },
    Array {
        elem: Box<ResolvedType>,
        len: u64,
    },
    Map {
        key: Box<ResolvedType>,
        value: Box<ResolvedType>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<SymbolField>,
    },
    Interface,
    Func,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ResolvedType,
    #[serde(default)]
    pub embedded: bool,
}

/// Finds generic structs in a `SymbolIndex`, keyed by package path.
#[derive(Clone, Debug, Default)]
pub struct SymbolTableLocator {
    index: SymbolIndex,
}

impl SymbolTableLocator {
    pub fn new(index: SymbolIndex) -> Self {
        Self { index }
    }

    pub fn from_json(json: &str) -> Result<Self, ShapeError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }
}

impl ShapeLocator for SymbolTableLocator {
    fn name(&self) -> &str {
        "symbol table"
    }

    fn locate(&self, ty: &NamedType) -> Result<Option<GenericShapeInfo>, ShapeError> {
        let package = match self.index.packages.get(&ty.package) {
            None => {
                return Err(ShapeError::PackageNotFound {
                    package: ty.package.clone(),
                });
            }
            Some(None) => {
                return Err(ShapeError::NilPackage {
                    package: ty.package.clone(),
                });
            }
            Some(Some(package)) => package,
        };

        let Some(scope) = &package.scope else {
            return Err(ShapeError::NilScope {
                package: ty.package.clone(),
            });
        };

        let Some(object) = scope.objects.get(&ty.name) else {
            return Ok(None);
        };

        let Object::TypeName { ty: resolved } = object else {
            return Err(ShapeError::NotTypeName {
                name: ty.name.clone(),
                kind: object.kind_name(),
            });
        };

        let ResolvedType::Named {
            type_params,
            underlying,
            ..
        } = resolved
        else {
            return Err(ShapeError::NotNamed {
                name: ty.name.clone(),
            });
        };

        let Some(ResolvedType::Struct { fields }) = underlying.as_deref() else {
            return Err(ShapeError::NotStruct {
                name: ty.name.clone(),
            });
        };

        if type_params.is_empty() {
            return Err(ShapeError::EmptyTypeParameters {
                name: ty.name.clone(),
            });
        }

        let fields = fields.iter().map(|f| (f.name.clone(), lower(&f.ty)));
        Ok(Some(GenericShapeInfo::from_fields(
            type_params.clone(),
            fields,
        )))
    }
}

/// Only parameter references become identifiers; basic and named types never
/// match a parameter.
fn lower(ty: &ResolvedType) -> TypeExpr {
    match ty {
        ResolvedType::Param { name } => TypeExpr::ident(name.as_str()),
        ResolvedType::Pointer { elem } => TypeExpr::pointer(lower(elem)),
        ResolvedType::Slice { elem } | ResolvedType::Array { elem, .. } => {
            TypeExpr::sequence(lower(elem))
        }
        ResolvedType::Map { key, value } => TypeExpr::map(lower(key), lower(value)),
        _ => TypeExpr::Other,
    }
}
