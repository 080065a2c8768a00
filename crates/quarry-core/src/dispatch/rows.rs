use crate::error::Error;
use futures::{
    TryStreamExt,
    stream::{self, BoxStream, StreamExt},
};
use std::fmt;

///
/// Rows
///
/// Result of a multi-row query: eagerly materialized, or a lazy stream for
/// unbuffered queries. A stream can be consumed once.
///

pub enum Rows<'a, T> {
    Buffered(Vec<T>),
    Streaming(BoxStream<'a, Result<T, Error>>),
}

impl<'a, T: Send + 'a> Rows<'a, T> {
    /// Drain into a `Vec`, stopping at the first error.
    pub async fn collect(self) -> Result<Vec<T>, Error> {
        match self {
            Self::Buffered(items) => Ok(items),
            Self::Streaming(stream) => stream.try_collect().await,
        }
    }

    #[must_use]
    pub fn into_stream(self) -> BoxStream<'a, Result<T, Error>> {
        match self {
            Self::Buffered(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
            Self::Streaming(stream) => stream,
        }
    }
}

impl<T> Rows<'_, T> {
    #[must_use]
    pub const fn is_buffered(&self) -> bool {
        matches!(self, Self::Buffered(_))
    }

    /// Materialized rows, if buffered.
    #[must_use]
    pub fn buffered(&self) -> Option<&[T]> {
        match self {
            Self::Buffered(items) => Some(items),
            Self::Streaming(_) => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Rows<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(items) => f.debug_tuple("Buffered").field(items).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}
