//! Core runtime for quarry: typed query contracts, the result-type mapping
//! registry, the dispatch pipeline and its pluggable collaborators (executor,
//! cache, observer).
#![warn(unreachable_pub)]

extern crate self as quarry_core;

// public exports are one module level down
pub mod args;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exec;
pub mod lifecycle;
pub mod mapping;
pub mod model;
pub mod obs;
pub mod query;
pub mod row;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, ErrorClass};

///
/// Prelude
///
/// Everything needed to declare and run queries against a connection.
///

pub mod prelude {
    pub use crate::{
        args::Arguments,
        cancel::CancellationToken,
        dispatch::{Connection, Rows},
        error::Error,
        model::{entity::EntityModel, field::FieldModel},
        query::{Facets, GridReader, MapQuery, MultipleQuery, SqlQuery, StreamQuery},
        row::RowView,
        traits::FromRow,
        value::Value,
    };
}
