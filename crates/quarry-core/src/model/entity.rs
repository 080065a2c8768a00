use crate::model::field::FieldModel;

///
/// EntityModel
/// Minimal, macro-generated mapping model for one result type.
///

#[derive(Debug, Eq, PartialEq)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (registry key and diagnostics).
    pub path: &'static str,
    /// Mapping unit: the declaring crate's package name.
    pub unit: &'static str,
    /// Table declaration used by convenience queries.
    pub table: Option<&'static str>,
    /// Members are bound as constructor parameters by name only.
    pub explicit_constructor: bool,
    /// Ordered member list (declaration order).
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    /// Find a member by its Rust name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Eligible for annotation-based registration.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        self.fields.iter().any(FieldModel::is_annotated)
    }

    /// Table name with surrounding whitespace removed.
    #[must_use]
    pub fn table_name(&self) -> Option<&'static str> {
        self.table.map(str::trim).filter(|t| !t.is_empty())
    }
}
