use crate::model::{entity::EntityModel, field::FieldModel};

///
/// MemberResolver
///
/// One strategy in a type map's resolver chain.
/// `None` means "no match here"; the chain moves on to the next strategy.
///

pub trait MemberResolver: Send + Sync {
    /// Human-readable strategy name for diagnostics.
    fn name(&self) -> &'static str;

    /// Member bound to `column`, if this strategy knows one.
    fn member(&self, model: &'static EntityModel, column: &str) -> Option<&'static FieldModel>;

    /// Constructor parameter bound to `column`.
    ///
    /// Strategies without constructor support keep the default.
    fn constructor_parameter(
        &self,
        _model: &'static EntityModel,
        _column: &str,
    ) -> Option<&'static FieldModel> {
        None
    }
}

///
/// AnnotationResolver
///
/// Binds a column to the first non-ignored member whose trimmed column
/// annotation equals the column name (case-sensitive).
///

#[derive(Clone, Copy, Debug, Default)]
pub struct AnnotationResolver;

impl MemberResolver for AnnotationResolver {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn member(&self, model: &'static EntityModel, column: &str) -> Option<&'static FieldModel> {
        model
            .fields
            .iter()
            .filter(|f| !f.ignored)
            .find(|f| f.annotation() == Some(column))
    }
}

///
/// ConventionResolver
///
/// Name-based fallback: exact member name first, then an ASCII
/// case-insensitive match. Ignored members are never bound.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ConventionResolver;

impl ConventionResolver {
    fn by_name(model: &'static EntityModel, column: &str) -> Option<&'static FieldModel> {
        let mut candidates = model.fields.iter().filter(|f| !f.ignored);

        candidates
            .clone()
            .find(|f| f.name == column)
            .or_else(|| candidates.find(|f| f.name.eq_ignore_ascii_case(column)))
    }
}

impl MemberResolver for ConventionResolver {
    fn name(&self) -> &'static str {
        "convention"
    }

    fn member(&self, model: &'static EntityModel, column: &str) -> Option<&'static FieldModel> {
        Self::by_name(model, column)
    }

    fn constructor_parameter(
        &self,
        model: &'static EntityModel,
        column: &str,
    ) -> Option<&'static FieldModel> {
        Self::by_name(model, column)
    }
}
