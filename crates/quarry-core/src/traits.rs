use crate::{error::Error, model::entity::EntityModel, row::RowView, value::Value};

///
/// FromRow
///
/// Materialization of one row into a typed result.
///
/// Mapped record types carry an [`EntityModel`] (emitted by
/// `#[derive(Entity)]`); scalars leave `MODEL` as `None` and read the first
/// column. Results are `Clone + Send + Sync` so they can be served from the
/// query cache.
///

pub trait FromRow: Clone + Send + Sync + Sized + 'static {
    const MODEL: Option<&'static EntityModel> = None;

    fn from_row(row: RowView<'_>) -> Result<Self, Error>;
}

macro_rules! impl_from_row_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: RowView<'_>) -> Result<Self, Error> {
                    row.scalar()
                }
            }
        )*
    };
}

impl_from_row_scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String, Vec<u8>, Value,
);
