//! Result-type mapping engine.
//!
//! Column→member bindings are resolved from derive-emitted metadata through an
//! ordered resolver chain (annotations first, naming conventions second) and
//! registered once per mapping unit.

mod catalog;
mod registry;
mod resolver;
mod type_map;

pub use catalog::{Catalog, catalog};
pub use registry::TypeRegistry;
pub use resolver::{AnnotationResolver, ConventionResolver, MemberResolver};
pub use type_map::{RowBinding, TypeMap};

use crate::{
    error::Error,
    row::{RowSet, RowView},
    traits::FromRow,
};

/// Materialize every row of `set` into `T` using the registry's bindings.
pub fn materialize<T: FromRow>(registry: &TypeRegistry, set: &RowSet) -> Result<Vec<T>, Error> {
    let binding = registry.binding_for::<T>(set.columns());

    set.iter()
        .map(|row| T::from_row(RowView::new(row.columns(), row.values(), binding.as_ref())))
        .collect()
}

/// Materialize only the leading row of `set`, if any.
pub fn materialize_first<T: FromRow>(
    registry: &TypeRegistry,
    set: &RowSet,
) -> Result<Option<T>, Error> {
    let Some(row) = set.first() else {
        return Ok(None);
    };
    let binding = registry.binding_for::<T>(set.columns());

    T::from_row(RowView::new(row.columns(), row.values(), binding.as_ref())).map(Some)
}
