use crate::exec::BlobStream;
use std::{
    fmt, io,
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

///
/// ResourceSet
///
/// Append-only set of resources created during one streaming operation.
/// Released in reverse creation order when the set is dropped.
///

#[derive(Default)]
pub struct ResourceSet {
    resources: Vec<Box<dyn Send>>,
}

impl ResourceSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    pub fn track<R: Send + 'static>(&mut self, resource: R) {
        self.resources.push(Box::new(resource));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        while let Some(resource) = self.resources.pop() {
            drop(resource);
        }
    }
}

impl fmt::Debug for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSet")
            .field("len", &self.resources.len())
            .finish()
    }
}

///
/// DbStream
///
/// Byte stream bound to a live data reader.
///
/// Holds the connection's exclusive borrow for as long as it lives. The stream
/// is released first, then the reader and command that back it.
///

pub struct DbStream<'c> {
    // Field order is drop order.
    stream: BlobStream,
    resources: ResourceSet,
    _connection: PhantomData<&'c mut ()>,
}

impl DbStream<'_> {
    pub(crate) fn new(stream: BlobStream, resources: ResourceSet) -> Self {
        Self {
            stream,
            resources,
            _connection: PhantomData,
        }
    }

    /// Number of backing resources (command, reader) held open.
    #[must_use]
    pub fn resources(&self) -> usize {
        self.resources.len()
    }
}

impl AsyncRead for DbStream<'_> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stream).poll_read(cx, buf)
    }
}

impl fmt::Debug for DbStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbStream")
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}
