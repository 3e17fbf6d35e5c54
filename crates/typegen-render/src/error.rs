use typegen_core::tag::TagError;

/// Errors that abort rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Model(#[from] typegen_model::Error),

    /// A map key that has no index-signature form.
    #[error("unsupported index type `{ty}`")]
    UnsupportedIndexType { ty: String },

    /// A type this renderer has no representation for.
    #[error("unsupported {kind} type `{ty}`")]
    UnsupportedKind { ty: String, kind: &'static str },

    #[error("generic type `{ty}` cannot be rendered as a table")]
    GenericTypesUnsupported { ty: String },

    #[error("field `{field}`: {source}")]
    InvalidTagValue {
        field: String,
        #[source]
        source: TagError,
    },

    /// The document root is not an interface of the graph.
    #[error("no interface declaration to use as root{}", root_suffix(.ty))]
    MissingRoot { ty: Option<String> },

    #[error("serialize schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RenderError>,
    },
}

fn root_suffix(ty: &Option<String>) -> String {
    ty.as_ref().map(|ty| format!(" `{ty}`")).unwrap_or_default()
}

impl RenderError {
    /// Innermost error, with every context layer removed.
    pub fn root(&self) -> &RenderError {
        let mut err = self;
        while let RenderError::Context { source, .. } = err {
            err = source;
        }
        err
    }

    pub(crate) fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
