//! Query contracts.
//!
//! Callers describe one database operation as a small value: SQL text, a named
//! argument record and a declared result type. Optional behaviour (caching,
//! timeouts, unbuffered reads) is attached through [`Facets`] and inspected by
//! the dispatch pipeline; contracts themselves carry no execution logic.

mod cardinality;
mod command;
mod contract;
mod convenience;
mod facet;
mod grid;
mod split;

pub(crate) use cardinality::Cardinality;
pub use command::{Command, CommandKind};
pub use contract::{MapQuery, MultipleQuery, SqlQuery, StreamQuery};
pub use convenience::{AllQuery, ByColumnQuery};
pub use facet::{Buffering, CachePolicy, Facets};
pub use grid::GridReader;
pub use split::{RowParts, Segments};
