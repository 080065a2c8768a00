use crate::{
    mapping::resolver::{AnnotationResolver, ConventionResolver, MemberResolver},
    model::{entity::EntityModel, field::FieldModel},
};
use std::fmt;
use tracing::trace;

///
/// TypeMap
///
/// Column→member resolution for one result type.
/// Resolvers are consulted in order; the first match wins.
///

pub struct TypeMap {
    model: &'static EntityModel,
    resolvers: Vec<Box<dyn MemberResolver>>,
}

impl TypeMap {
    /// Annotation resolver backed by the naming convention.
    #[must_use]
    pub fn annotated(model: &'static EntityModel) -> Self {
        Self::with_resolvers(
            model,
            vec![Box::new(AnnotationResolver), Box::new(ConventionResolver)],
        )
    }

    /// Naming convention only; used for types that were never registered.
    #[must_use]
    pub fn conventional(model: &'static EntityModel) -> Self {
        Self::with_resolvers(model, vec![Box::new(ConventionResolver)])
    }

    #[must_use]
    pub fn with_resolvers(
        model: &'static EntityModel,
        resolvers: Vec<Box<dyn MemberResolver>>,
    ) -> Self {
        Self { model, resolvers }
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        self.model
    }

    /// Resolve the member a column binds to.
    ///
    /// Types built through an explicit constructor bind by constructor
    /// parameter; strategies that cannot do that are skipped.
    #[must_use]
    pub fn member(&self, column: &str) -> Option<&'static FieldModel> {
        if self.model.explicit_constructor {
            self.resolvers
                .iter()
                .find_map(|r| r.constructor_parameter(self.model, column))
        } else {
            self.resolvers
                .iter()
                .find_map(|r| r.member(self.model, column))
        }
    }

    /// Bind an ordered column list. Unresolved columns stay unbound.
    #[must_use]
    pub fn bind(&self, columns: &[String]) -> RowBinding {
        let members = columns
            .iter()
            .map(|column| {
                let member = self.member(column).map(|f| f.name);
                if member.is_none() {
                    trace!(ty = self.model.path, column, "column left unbound");
                }
                member
            })
            .collect();

        RowBinding { members }
    }
}

impl fmt::Debug for TypeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMap")
            .field("model", &self.model.path)
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

///
/// RowBinding
///
/// Member bound to each column ordinal of one result set.
/// When two columns bind the same member, the later one wins.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowBinding {
    members: Vec<Option<&'static str>>,
}

impl RowBinding {
    /// Ordinal of the column feeding `member`.
    #[must_use]
    pub fn ordinal(&self, member: &str) -> Option<usize> {
        self.members.iter().rposition(|m| *m == Some(member))
    }

    /// Member fed by the column at `ordinal`.
    #[must_use]
    pub fn member(&self, ordinal: usize) -> Option<&'static str> {
        self.members.get(ordinal).copied().flatten()
    }

    pub fn unbound(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.is_none().then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: [FieldModel; 3] = [
        FieldModel::new("id").column("user_id"),
        FieldModel::new("user_id"),
        FieldModel::new("name"),
    ];

    static MODEL: EntityModel = EntityModel {
        path: "type_map_tests::User",
        unit: "type_map_tests",
        table: None,
        explicit_constructor: false,
        fields: &FIELDS,
    };

    static CTOR_MODEL: EntityModel = EntityModel {
        path: "type_map_tests::Point",
        unit: "type_map_tests",
        table: None,
        explicit_constructor: true,
        fields: &FIELDS,
    };

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn annotation_wins_over_matching_convention() {
        let map = TypeMap::annotated(&MODEL);

        assert_eq!(map.member("user_id").map(|f| f.name), Some("id"));
        assert_eq!(map.member("NAME").map(|f| f.name), Some("name"));
    }

    #[test]
    fn unresolved_columns_stay_unbound() {
        let binding = TypeMap::annotated(&MODEL).bind(&columns(&["user_id", "extra", "name"]));

        assert_eq!(binding.ordinal("id"), Some(0));
        assert_eq!(binding.ordinal("name"), Some(2));
        assert_eq!(binding.member(1), None);
        assert_eq!(binding.unbound().collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn later_columns_win_for_the_same_member() {
        let binding = TypeMap::conventional(&MODEL).bind(&columns(&["name", "Name"]));

        assert_eq!(binding.ordinal("name"), Some(1));
    }

    #[test]
    fn explicit_constructor_skips_annotation_strategy() {
        let map = TypeMap::annotated(&CTOR_MODEL);

        assert_eq!(map.member("user_id").map(|f| f.name), Some("user_id"));
        assert!(format!("{map:?}").contains("annotation"));
    }
}
