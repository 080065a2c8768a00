use crate::{
    error::Error,
    mapping::{Catalog, TypeRegistry},
    model::{entity::EntityModel, field::FieldModel},
    row::RowView,
    traits::FromRow,
};
use std::sync::LazyLock;

/// Mapping unit shared by every fixture entity.
pub const FIXTURE_UNIT: &str = "quarry_core_fixtures";

static CATALOG: Catalog = Catalog::new();

static REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(|| {
    for model in [&USER_MODEL, &ORDER_MODEL, &TAG_MODEL] {
        CATALOG.insert(model);
    }

    TypeRegistry::new(&CATALOG)
});

/// Registry over the fixture catalog.
pub fn registry() -> &'static TypeRegistry {
    &REGISTRY
}

///
/// User
///
/// `id` is annotated with its own name, `email` with a padded column name
/// and `cache_hint` is ignored.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub cache_hint: String,
}

static USER_FIELDS: [FieldModel; 4] = [
    FieldModel::new("id").column("id"),
    FieldModel::new("name"),
    FieldModel::new("email").column(" email_address "),
    FieldModel::new("cache_hint").column("name").ignored(),
];

pub static USER_MODEL: EntityModel = EntityModel {
    path: "quarry_core::test_support::User",
    unit: FIXTURE_UNIT,
    table: Some("User"),
    explicit_constructor: false,
    fields: &USER_FIELDS,
};

impl FromRow for User {
    const MODEL: Option<&'static EntityModel> = Some(&USER_MODEL);

    fn from_row(row: RowView<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: row.member("id")?,
            name: row.member("name")?,
            email: row.member("email")?,
            cache_hint: String::default(),
        })
    }
}

///
/// Order
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Order {
    pub id: i64,
    pub total: f64,
}

static ORDER_FIELDS: [FieldModel; 2] = [
    FieldModel::new("id").column("order_id"),
    FieldModel::new("total"),
];

pub static ORDER_MODEL: EntityModel = EntityModel {
    path: "quarry_core::test_support::Order",
    unit: FIXTURE_UNIT,
    table: Some("Order"),
    explicit_constructor: false,
    fields: &ORDER_FIELDS,
};

impl FromRow for Order {
    const MODEL: Option<&'static EntityModel> = Some(&ORDER_MODEL);

    fn from_row(row: RowView<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: row.member("id")?,
            total: row.member("total")?,
        })
    }
}

///
/// Tag
/// Annotated, but without a table declaration.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
    pub label: String,
}

static TAG_FIELDS: [FieldModel; 1] = [FieldModel::new("label").column("tag_label")];

pub static TAG_MODEL: EntityModel = EntityModel {
    path: "quarry_core::test_support::Tag",
    unit: FIXTURE_UNIT,
    table: None,
    explicit_constructor: false,
    fields: &TAG_FIELDS,
};

impl FromRow for Tag {
    const MODEL: Option<&'static EntityModel> = Some(&TAG_MODEL);

    fn from_row(row: RowView<'_>) -> Result<Self, Error> {
        Ok(Self {
            label: row.member("label")?,
        })
    }
}
