//! Convenience queries synthesized from entity declarations.
//!
//! The column lookup is capped at 1000 rows to guard against unranged scans;
//! get-all is uncapped unless a limit is given.

use crate::{
    args::Arguments,
    error::Error,
    model::entity::EntityModel,
    query::contract::SqlQuery,
    traits::FromRow,
    value::Value,
};
use std::{any::type_name, marker::PhantomData};

/// Row cap applied to every column lookup.
pub const LOOKUP_CAP: u32 = 1000;

///
/// ByColumnQuery
/// `select top 1000 t.* from {table} t where t.{column} = @value`
///

#[derive(Debug)]
pub struct ByColumnQuery<T> {
    sql: String,
    value: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromRow> ByColumnQuery<T> {
    /// Look rows up by the column annotated on `member`.
    pub fn new(member: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let model = model_of::<T>()?;
        let table = table_of::<T>(model)?;

        let field = model.field(member).ok_or_else(|| {
            Error::configuration(format!("{} has no member '{member}'", type_name::<T>()))
        })?;
        let column = field
            .annotation()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "member '{member}' of {} has no column declaration",
                    type_name::<T>()
                ))
            })?;

        Ok(Self {
            sql: format!("select top {LOOKUP_CAP} t.* from {table} t where t.{column} = @value"),
            value: value.into(),
            _marker: PhantomData,
        })
    }
}

impl<T: FromRow> SqlQuery for ByColumnQuery<T> {
    type Output = T;

    fn sql(&self) -> &str {
        &self.sql
    }

    fn arguments(&self) -> Arguments {
        Arguments::new().with("value", self.value.clone())
    }
}

///
/// AllQuery
/// `select [top {N}] t.* from {table} t`
///

#[derive(Debug)]
pub struct AllQuery<T> {
    sql: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromRow> AllQuery<T> {
    pub fn new(max_rows: Option<u32>) -> Result<Self, Error> {
        let table = table_of::<T>(model_of::<T>()?)?;
        let top = max_rows.map(|n| format!("top {n}")).unwrap_or_default();

        Ok(Self {
            sql: format!("select {top} t.* from {table} t"),
            _marker: PhantomData,
        })
    }
}

impl<T: FromRow> SqlQuery for AllQuery<T> {
    type Output = T;

    fn sql(&self) -> &str {
        &self.sql
    }
}

fn model_of<T: FromRow>() -> Result<&'static EntityModel, Error> {
    T::MODEL.ok_or_else(|| {
        Error::configuration(format!(
            "{} is not an entity; only types with a table declaration may be used",
            type_name::<T>()
        ))
    })
}

fn table_of<T>(model: &'static EntityModel) -> Result<&'static str, Error> {
    model.table_name().ok_or_else(|| {
        Error::configuration(format!(
            "{} has no table declaration; add #[quarry(table = \"...\")]",
            type_name::<T>()
        ))
    })
}
