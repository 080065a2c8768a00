use crate::{
    cache::{NoopCache, QueryCache},
    config::ConnectionOptions,
    dispatch::Connection,
    exec::Executor,
    mapping::TypeRegistry,
    obs::{QueryObserver, TracingObserver},
};
use std::sync::Arc;

///
/// ConnectionBuilder
///
/// Wires a connection's collaborators. Defaults: no caching, tracing
/// observer, the process-wide type registry and 30s command timeout.
///

pub struct ConnectionBuilder {
    options: ConnectionOptions,
    cache: Arc<dyn QueryCache>,
    observer: Arc<dyn QueryObserver>,
    registry: &'static TypeRegistry,
}

impl ConnectionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ConnectionOptions::default(),
            cache: Arc::new(NoopCache),
            observer: Arc::new(TracingObserver),
            registry: TypeRegistry::global(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Share a cache provider between connections.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: &'static TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build<E: Executor>(self, executor: E) -> Connection<E> {
        Connection {
            executor,
            cache: self.cache,
            observer: self.observer,
            registry: self.registry,
            options: self.options,
        }
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
