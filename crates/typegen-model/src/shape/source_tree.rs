//! Shape lookup by parsing the program's own source files.

use std::fs;
use std::path::{Path, PathBuf};

use syn::{Fields, GenericArgument, Item, ItemStruct, PathArguments, Type};
use typegen_core::NamedType;
use typegen_core::utils::to_pascal_case;

use super::{GenericShapeInfo, ShapeError, ShapeLocator, TypeExpr};

/// Finds `struct Name<T, ...> { ... }` in `.rs` files below a root directory.
///
/// Files are parsed, never compiled. Directories are walked in sorted order;
/// `target` and hidden directories are skipped. Structs without type
/// parameters are passed over so a later locator can still find the type.
///
/// Fields are keyed by their descriptor name, the PascalCase form of the
/// Rust identifier (`by_key` becomes `ByKey`). A file `syn` cannot parse is
/// skipped; its error is returned only when no other file declares the type.
#[derive(Clone, Debug)]
pub struct SourceTreeLocator {
    root: Option<PathBuf>,
}

impl SourceTreeLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Root at the working directory, read when a lookup runs.
    pub fn current_dir() -> Self {
        Self { root: None }
    }

    fn root(&self) -> Result<PathBuf, ShapeError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|source| ShapeError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}

impl ShapeLocator for SourceTreeLocator {
    fn name(&self) -> &str {
        "source tree"
    }

    fn locate(&self, ty: &NamedType) -> Result<Option<GenericShapeInfo>, ShapeError> {
        let mut files = Vec::new();
        collect_sources(&self.root()?, &mut files)?;
        let mut unparsable = None;

        for path in files {
            let text = fs::read_to_string(&path).map_err(|source| ShapeError::Io {
                path: path.clone(),
                source,
            })?;
            let file = match syn::parse_file(&text) {
                Ok(file) => file,
                Err(source) => {
                    tracing::debug!(path = %path.display(), error = %source, "skipping unparsable file");
                    if unparsable.is_none() {
                        unparsable = Some(ShapeError::Parse { path, source });
                    }
                    continue;
                }
            };

            if let Some(info) = find_in_items(&file.items, &ty.name) {
                tracing::trace!(path = %path.display(), ty = %ty.name, "found generic declaration");
                return Ok(Some(info));
            }
        }

        // A file that failed to parse may have held the type.
        match unparsable {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ShapeError> {
    let io_err = |source| ShapeError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();

    for path in entries {
        let hidden_or_target = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.') || n == "target");

        if path.is_dir() {
            if !hidden_or_target {
                collect_sources(&path, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }

    Ok(())
}

fn find_in_items(items: &[Item], name: &str) -> Option<GenericShapeInfo> {
    for item in items {
        match item {
            Item::Struct(item) if item.ident == name => {
                if let Some(info) = shape_info(item) {
                    return Some(info);
                }
            }
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content
                    && let Some(info) = find_in_items(items, name)
                {
                    return Some(info);
                }
            }
            _ => {}
        }
    }
    None
}

fn shape_info(item: &ItemStruct) -> Option<GenericShapeInfo> {
    let params: Vec<String> = item
        .generics
        .type_params()
        .map(|p| p.ident.to_string())
        .collect();
    if params.is_empty() {
        return None;
    }

    let Fields::Named(fields) = &item.fields else {
        return None;
    };

    let fields = fields.named.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        Some((to_pascal_case(&ident.to_string()), lower(&field.ty)))
    });

    Some(GenericShapeInfo::from_fields(params, fields))
}

/// Reduce a syntactic type to a `TypeExpr`.
fn lower(ty: &Type) -> TypeExpr {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            let Some(segment) = path.path.segments.last() else {
                return TypeExpr::Other;
            };
            let args = type_args(&segment.arguments);

            if path.path.segments.len() == 1 && args.is_empty() {
                return TypeExpr::Ident(segment.ident.to_string());
            }

            match (segment.ident.to_string().as_str(), args.as_slice()) {
                ("Option", [inner]) => TypeExpr::pointer(lower(inner)),
                ("Box" | "Rc" | "Arc", [inner]) => lower(inner),
                ("Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "IndexSet", [element, ..]) => {
                    TypeExpr::sequence(lower(element))
                }
                ("HashMap" | "BTreeMap" | "IndexMap", [key, value, ..]) => {
                    TypeExpr::map(lower(key), lower(value))
                }
                _ => TypeExpr::Other,
            }
        }
        Type::Ptr(ptr) => TypeExpr::pointer(lower(&ptr.elem)),
        Type::Reference(reference) => lower(&reference.elem),
        Type::Array(array) => TypeExpr::sequence(lower(&array.elem)),
        Type::Slice(slice) => TypeExpr::sequence(lower(&slice.elem)),
        Type::Paren(paren) => lower(&paren.elem),
        Type::Group(group) => lower(&group.elem),
        _ => TypeExpr::Other,
    }
}

fn type_args(arguments: &PathArguments) -> Vec<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return Vec::new();
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
        .collect()
}
