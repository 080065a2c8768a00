use crate::{
    error::Error,
    mapping::RowBinding,
    value::{FromValue, Value},
};
use derive_more::{Deref, IntoIterator};
use std::sync::Arc;

///
/// Columns
/// Column names shared by every row of one result set.
///

pub type Columns = Arc<[String]>;

///
/// Row
///

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Columns,
    values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub const fn new(columns: Columns, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by exact column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

///
/// RowSet
/// One fully materialized result set.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct RowSet {
    columns: Columns,
    #[deref]
    #[into_iterator(owned, ref)]
    rows: Vec<Row>,
}

impl RowSet {
    /// Build a result set from column names and positional rows.
    pub fn new<C, S>(columns: C, rows: Vec<Vec<Value>>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Columns = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

///
/// RowView
///
/// A window over one row (or one split segment of it) together with the
/// column→member binding resolved for the target type.
///

#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    columns: &'a [String],
    values: &'a [Value],
    binding: Option<&'a RowBinding>,
}

impl<'a> RowView<'a> {
    #[must_use]
    pub const fn new(
        columns: &'a [String],
        values: &'a [Value],
        binding: Option<&'a RowBinding>,
    ) -> Self {
        Self {
            columns,
            values,
            binding,
        }
    }

    #[must_use]
    pub const fn columns(&self) -> &'a [String] {
        self.columns
    }

    #[must_use]
    pub const fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Read the first column as a scalar result.
    pub fn scalar<T: FromValue>(&self) -> Result<T, Error> {
        let target = self.columns.first().map_or("<scalar>", String::as_str);
        let value = self.values.first().cloned().unwrap_or_default();

        T::from_value(value).map_err(|err| Error::mapping(target, err))
    }

    /// Read a value by exact column name, bypassing member bindings.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T, Error> {
        let value = self
            .columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .cloned()
            .unwrap_or_default();

        T::from_value(value).map_err(|err| Error::mapping(column, err))
    }

    /// Read the value bound to `member`.
    ///
    /// Unbound members and NULL cells yield `T::default()`.
    pub fn member<T: FromValue + Default>(&self, member: &str) -> Result<T, Error> {
        let value = self
            .binding
            .and_then(|binding| binding.ordinal(member))
            .and_then(|i| self.values.get(i));

        match value {
            Some(value) if !value.is_null() => {
                T::from_value(value.clone()).map_err(|err| Error::mapping(member, err))
            }
            _ => Ok(T::default()),
        }
    }
}
