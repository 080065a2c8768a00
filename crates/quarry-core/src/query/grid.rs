use crate::{
    cancel::CancellationToken,
    error::Error,
    exec::ResultSetCursor,
    mapping::{TypeRegistry, materialize, materialize_first},
    query::cardinality::Cardinality,
    row::RowSet,
    traits::FromRow,
};
use std::any::type_name;

///
/// GridReader
///
/// Sequential reader over the result sets of one multi-set query.
/// Each `read*` call consumes exactly one result set, in order.
///

pub struct GridReader<'a> {
    cursor: &'a mut dyn ResultSetCursor,
    registry: &'a TypeRegistry,
    cancel: &'a CancellationToken,
    sets_read: usize,
    consumed: bool,
}

impl<'a> GridReader<'a> {
    pub(crate) fn new(
        cursor: &'a mut dyn ResultSetCursor,
        registry: &'a TypeRegistry,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            cursor,
            registry,
            cancel,
            sets_read: 0,
            consumed: false,
        }
    }

    /// Read the next result set as a sequence of `T`.
    pub async fn read<T: FromRow>(&mut self) -> Result<Vec<T>, Error> {
        let set = self.next_set().await?;
        self.registry.ensure_registered::<T>();

        materialize(self.registry, &set)
    }

    pub async fn read_first<T: FromRow>(&mut self) -> Result<T, Error> {
        required(self.read_one(Cardinality::First).await?)
    }

    pub async fn read_first_or_default<T: FromRow>(&mut self) -> Result<Option<T>, Error> {
        self.read_one(Cardinality::FirstOrDefault).await
    }

    pub async fn read_single<T: FromRow>(&mut self) -> Result<T, Error> {
        required(self.read_one(Cardinality::Single).await?)
    }

    pub async fn read_single_or_default<T: FromRow>(&mut self) -> Result<Option<T>, Error> {
        self.read_one(Cardinality::SingleOrDefault).await
    }

    /// True once the cursor has reported that no result sets remain.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }

    #[must_use]
    pub const fn sets_read(&self) -> usize {
        self.sets_read
    }

    async fn read_one<T: FromRow>(&mut self, cardinality: Cardinality) -> Result<Option<T>, Error> {
        let set = self.next_set().await?;
        self.registry.ensure_registered::<T>();
        cardinality.check::<T>(set.len())?;

        materialize_first(self.registry, &set)
    }

    async fn next_set(&mut self) -> Result<RowSet, Error> {
        if self.consumed {
            return Err(Error::ResultSetsExhausted);
        }

        match self.cancel.guard(self.cursor.next_set()).await? {
            Some(set) => {
                self.sets_read += 1;
                Ok(set)
            }
            None => {
                self.consumed = true;
                Err(Error::ResultSetsExhausted)
            }
        }
    }
}

fn required<T>(value: Option<T>) -> Result<T, Error> {
    value.ok_or(Error::NotFound {
        result_type: type_name::<T>(),
    })
}
