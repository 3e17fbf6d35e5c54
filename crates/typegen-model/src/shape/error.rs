use std::fmt::Write as _;
use std::path::PathBuf;

/// Failures of generic shape resolution.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("package `{package}` not found in symbol index")]
    PackageNotFound { package: String },

    #[error("package `{package}` is nil")]
    NilPackage { package: String },

    #[error("package `{package}` has a nil scope")]
    NilScope { package: String },

    #[error("`{name}` is a {kind}, not a type name")]
    NotTypeName { name: String, kind: &'static str },

    #[error("`{name}` is not a named type")]
    NotNamed { name: String },

    #[error("`{name}` is not a struct")]
    NotStruct { name: String },

    #[error("`{name}` has empty type parameters")]
    EmptyTypeParameters { name: String },

    #[error("empty type name for `{ty}`")]
    EmptyTypeName { ty: String },

    #[error("`{name}` is not a generic type")]
    NotGeneric { name: String },

    #[error("read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("symbol index: {0}")]
    Index(#[from] serde_json::Error),

    /// Every locator failed for a type known to be generic.
    #[error("missing generic type info for `{ty}`{}", join_causes(.causes))]
    MissingGenericTypeInfo { ty: String, causes: Vec<ShapeError> },
}

fn join_causes(causes: &[ShapeError]) -> String {
    let mut out = String::new();
    for cause in causes {
        let _ = write!(out, "\n  {cause}");
    }
    out
}
