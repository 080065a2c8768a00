use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

///
/// CachePolicy
/// Cache key plus entry lifetime supplied by a cacheable query.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CachePolicy {
    key: String,
    lifetime: Duration,
}

impl CachePolicy {
    #[must_use]
    pub fn new(key: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            key: key.into(),
            lifetime,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

///
/// Buffering
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Buffering {
    /// Rows are materialized eagerly into a `Vec`.
    #[default]
    Buffered,
    /// Rows are produced lazily and may be consumed once.
    Unbuffered,
}

///
/// Facets
///
/// Optional, independently combinable capabilities of a query contract.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Facets {
    pub cache: Option<CachePolicy>,
    pub timeout: Option<Duration>,
    pub buffering: Buffering,
}

impl Facets {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cache: None,
            timeout: None,
            buffering: Buffering::Buffered,
        }
    }

    /// Serve results from (and store them into) the cache under `key`.
    #[must_use]
    pub fn cached(mut self, key: impl Into<String>, lifetime: Duration) -> Self {
        self.cache = Some(CachePolicy::new(key, lifetime));
        self
    }

    /// Override the connection's default command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn unbuffered(mut self) -> Self {
        self.buffering = Buffering::Unbuffered;
        self
    }

    #[must_use]
    pub const fn is_buffered(&self) -> bool {
        matches!(self.buffering, Buffering::Buffered)
    }

    /// Custom timeout if set, else `default`.
    #[must_use]
    pub fn resolve_timeout(&self, default: Option<Duration>) -> Option<Duration> {
        self.timeout.or(default)
    }

    /// Reject facet combinations that cannot be honoured for row queries.
    pub fn validate(&self) -> Result<(), Error> {
        match (&self.cache, self.buffering) {
            (Some(policy), Buffering::Unbuffered) => Err(Error::configuration(format!(
                "query cached under '{}' cannot be unbuffered: lazy rows are not cacheable",
                policy.key
            ))),
            _ => Ok(()),
        }
    }

    /// Stream queries read a live reader and can never be cached.
    pub fn validate_for_stream(&self) -> Result<(), Error> {
        match &self.cache {
            Some(policy) => Err(Error::configuration(format!(
                "stream query cannot be cached (key '{}'): a live reader is not a value",
                policy.key
            ))),
            None => Ok(()),
        }
    }
}
