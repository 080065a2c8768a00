use crate::model::entity::EntityModel;
use std::sync::{PoisonError, RwLock};

///
/// CATALOG
/// Process-wide list of derived models, filled by registration constructors.
///

static CATALOG: Catalog = Catalog::new();

/// The catalog `#[derive(Entity)]` registers into.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

///
/// Catalog
///
/// Append-only set of entity models keyed by type path.
/// Consulted by the registry when a mapping unit is first scanned.
///

#[derive(Debug, Default)]
pub struct Catalog {
    models: RwLock<Vec<&'static EntityModel>>,
}

impl Catalog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: RwLock::new(Vec::new()),
        }
    }

    /// Record a model; a second insert of the same path is ignored.
    pub fn insert(&self, model: &'static EntityModel) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);

        if !models.iter().any(|m| m.path == model.path) {
            models.push(model);
        }
    }

    /// Look up a model by type path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&'static EntityModel> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .find(|m| m.path == path)
    }

    /// Every model declared by `unit`, in registration order.
    #[must_use]
    pub fn unit(&self, unit: &str) -> Vec<&'static EntityModel> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .filter(|m| m.unit == unit)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
