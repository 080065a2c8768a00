//! Query instrumentation.
//!
//! The pipeline reports every executed query to a [`QueryObserver`]. Reports
//! are best-effort: observer panics are caught and logged, never surfaced.

mod observer;

pub use observer::{NoopObserver, QueryExecuted, QueryObserver, TracingObserver};

pub(crate) use observer::report;
