use crate::args::Arguments;
use serde::Serialize;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    time::Duration,
};
use tracing::{debug, warn};

///
/// QueryExecuted
/// Timing report for one executed query.
///

#[derive(Clone, Debug, Serialize)]
pub struct QueryExecuted {
    /// Contract type that described the query.
    pub query_type: &'static str,
    pub result_type: &'static str,
    pub sql: String,
    pub arguments: Arguments,
    pub database: String,
    pub duration: Duration,
}

///
/// QueryObserver
///
/// Synchronous, fire-and-forget sink. Implementations must not block.
///

pub trait QueryObserver: Send + Sync {
    fn on_query_executed(&self, event: &QueryExecuted);
}

///
/// TracingObserver
/// Emits one `debug!` event per executed query.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn on_query_executed(&self, event: &QueryExecuted) {
        debug!(
            query = event.query_type,
            result = event.result_type,
            sql = %event.sql,
            database = %event.database,
            duration_ms = event.duration.as_millis(),
            "query executed"
        );
    }
}

///
/// NoopObserver
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn on_query_executed(&self, _event: &QueryExecuted) {}
}

/// Deliver `event`, swallowing observer panics.
pub(crate) fn report(observer: &dyn QueryObserver, event: &QueryExecuted) {
    if catch_unwind(AssertUnwindSafe(|| observer.on_query_executed(event))).is_err() {
        warn!(
            query = event.query_type,
            sql = %event.sql,
            "query observer panicked; report dropped"
        );
    }
}
