use super::{Shape, ShapeKind};

/// Declared (unresolved) field type, reduced to what shape matching needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeExpr {
    /// A bare name that may be a type parameter.
    Ident(String),
    Pointer(Box<TypeExpr>),
    Sequence(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Anything that cannot carry a parameter at a matched position.
    Other,
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn sequence(element: TypeExpr) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

/// Find the parameter a field type carries and the shape it is carried in.
///
/// The parameter must appear as a bare identifier. Only the outermost
/// wrapping layer names the shape: `Option<Vec<T>>` is a pointer shape.
/// The map value is checked before the map key.
pub fn detect_shape(expr: &TypeExpr, params: &[String]) -> Option<Shape> {
    let (param, kind) = match expr {
        TypeExpr::Ident(name) => {
            let param = params.iter().find(|p| *p == name)?;
            (param.clone(), ShapeKind::Direct)
        }
        TypeExpr::Pointer(inner) => (detect_shape(inner, params)?.param, ShapeKind::Pointer),
        TypeExpr::Sequence(element) => (detect_shape(element, params)?.param, ShapeKind::Sequence),
        TypeExpr::Map { key, value } => {
            if let Some(shape) = detect_shape(value, params) {
                (shape.param, ShapeKind::MapValue)
            } else {
                (detect_shape(key, params)?.param, ShapeKind::MapKey)
            }
        }
        TypeExpr::Other => return None,
    };

    Some(Shape { param, kind })
}
