//! ## Crate layout
//! - `core`: values, rows, query contracts, the mapping registry, the dispatch
//!   pipeline and its collaborator traits (executor, cache, observer).
//! - `Entity`: derive macro emitting mapping metadata and row materialization.
//!
//! The `prelude` module covers what query-authoring code needs.

pub use quarry_core as core;
pub use quarry_derive::Entity;

// export so generated code resolves inside this crate's tests
extern crate self as quarry;

/// re-exports
///
/// generated code uses these, so downstream crates do not have to list them
/// in their own Cargo.toml
#[doc(hidden)]
pub mod __reexports {
    pub use ctor;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{Error, ErrorClass, args};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Entity,
        core::{
            args::Arguments,
            cache::{MemoryCache, NoopCache, QueryCache},
            cancel::CancellationToken,
            config::ConnectionOptions,
            dispatch::{Connection, ConnectionBuilder, Rows},
            error::{Error, ErrorClass},
            exec::Executor,
            query::{Facets, GridReader, MapQuery, MultipleQuery, SqlQuery, StreamQuery},
            traits::FromRow as _,
            value::Value,
        },
    };
    pub use async_trait::async_trait;
    pub use serde::Serialize;
}
