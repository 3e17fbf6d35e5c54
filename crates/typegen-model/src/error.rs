use crate::shape::{ShapeError, ShapeKind};

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Only structs can become interface declarations.
    #[error("cannot declare interface for {kind} type `{ty}`")]
    NotAStruct { ty: String, kind: &'static str },

    /// A field type no renderer can represent (functions).
    #[error("unsupported {kind} type `{ty}`")]
    UnsupportedKind { ty: String, kind: &'static str },

    /// A type parameter's representative field is missing on the concrete type.
    #[error("type parameter `{param}` of `{ty}` refers to missing field `{field}`")]
    NoMatchingField {
        ty: String,
        param: String,
        field: String,
    },

    /// A field's concrete type does not have the shape recorded for it.
    #[error("field `{field}` of `{ty}` is not of shape {shape}")]
    ShapeMismatch {
        ty: String,
        field: String,
        shape: ShapeKind,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A property points at a field its owner does not have.
    #[error("property `{property}` refers to missing field #{index} of `{owner}`")]
    NilField {
        property: String,
        owner: String,
        index: usize,
    },

    /// A type has no declaration in the graph.
    #[error("no declaration for `{ty}`")]
    NilDeclaration { ty: String },

    /// `finish` was called after an `add` failed.
    #[error("declaration graph is incomplete: a previous add failed")]
    IncompleteGraph,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Innermost error, with every context layer removed.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// Context layers, outermost first.
    pub fn contexts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut err = self;
        while let Error::Context { context, source } = err {
            out.push(context.as_str());
            err = source;
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach the offending type or field to an error as it propagates.
pub trait ResultExt<T> {
    fn with_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Error::Context {
            context: context(),
            source: Box::new(err.into()),
        })
    }
}
