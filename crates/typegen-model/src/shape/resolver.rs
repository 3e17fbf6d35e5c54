use typegen_core::{NamedType, TypeId, TypeTable};

use super::{GenericShapeInfo, ShapeError, SourceTreeLocator, SymbolTableLocator};

/// One static-analysis strategy for finding a generic struct's declaration.
pub trait ShapeLocator {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// `Ok(None)` when this locator does not know the type.
    fn locate(&self, ty: &NamedType) -> Result<Option<GenericShapeInfo>, ShapeError>;
}

/// Ordered list of locators; the first success wins.
pub struct ShapeResolver {
    locators: Vec<Box<dyn ShapeLocator>>,
}

impl Default for ShapeResolver {
    /// Source tree of the current directory, then an empty symbol index.
    fn default() -> Self {
        Self::empty()
            .with_locator(SourceTreeLocator::current_dir())
            .with_locator(SymbolTableLocator::default())
    }
}

impl ShapeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver without locators. Every generic type fails to resolve.
    pub fn empty() -> Self {
        Self {
            locators: Vec::new(),
        }
    }

    pub fn with_locator(mut self, locator: impl ShapeLocator + 'static) -> Self {
        self.locators.push(Box::new(locator));
        self
    }

    pub fn locator_names(&self) -> impl Iterator<Item = &str> {
        self.locators.iter().map(|l| l.name())
    }

    /// Resolve the shape info of a generic struct.
    ///
    /// The type must be a named, generic struct; pointers are looked through.
    pub fn resolve(&self, table: &TypeTable, ty: TypeId) -> Result<GenericShapeInfo, ShapeError> {
        let ty = table.normalize(ty);
        let descriptor = table.descriptor(ty);

        if !descriptor.kind.is_struct() {
            return Err(ShapeError::NotStruct {
                name: table.display(ty),
            });
        }
        let Some(named) = descriptor.named.as_ref().filter(|n| !n.name.is_empty()) else {
            return Err(ShapeError::EmptyTypeName {
                ty: table.display(ty),
            });
        };
        if !named.is_generic() {
            return Err(ShapeError::NotGeneric {
                name: named.name.clone(),
            });
        }

        self.locate(named, || table.display(ty))
    }

    fn locate(
        &self,
        named: &NamedType,
        display: impl FnOnce() -> String,
    ) -> Result<GenericShapeInfo, ShapeError> {
        let mut causes = Vec::new();

        for locator in &self.locators {
            match locator.locate(named) {
                Ok(Some(info)) => {
                    tracing::debug!(
                        locator = locator.name(),
                        ty = %named.name,
                        params = ?info.type_params,
                        "resolved generic shape"
                    );
                    return Ok(info);
                }
                Ok(None) => {
                    tracing::trace!(locator = locator.name(), ty = %named.name, "type not found");
                }
                Err(err) => {
                    tracing::debug!(locator = locator.name(), ty = %named.name, error = %err, "locator failed");
                    causes.push(err);
                }
            }
        }

        Err(ShapeError::MissingGenericTypeInfo {
            ty: display(),
            causes,
        })
    }
}
