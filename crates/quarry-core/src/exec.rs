//! Execution boundary.
//!
//! The core never talks to a database itself. An [`Executor`] runs resolved
//! [`Command`]s and hands back rows, cursors or live readers; its errors are
//! surfaced to callers unchanged.

use crate::{
    query::Command,
    row::{Row, RowSet},
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::AsyncRead;

/// Executor failure, passed through to callers untouched.
pub type ExecError = Box<dyn std::error::Error + Send + Sync>;

/// Lazily produced rows of an unbuffered query.
pub type RowStream = BoxStream<'static, Result<Row, ExecError>>;

/// Byte stream over one binary column of a live reader.
pub type BlobStream = Box<dyn AsyncRead + Send + Unpin>;

///
/// Executor
///
/// "Run SQL against a connection" capability consumed by the dispatch
/// pipeline. Timeouts and command kinds arrive on the [`Command`].
///

#[async_trait]
pub trait Executor: Send + Sync {
    /// Name of the target database, reported to observers.
    fn database(&self) -> &str;

    fn is_open(&self) -> bool {
        true
    }

    async fn open(&mut self) -> Result<(), ExecError> {
        Ok(())
    }

    /// Run a command and materialize all of its rows.
    async fn query(&self, command: &Command) -> Result<RowSet, ExecError>;

    /// Run a command yielding rows lazily.
    ///
    /// The default buffers through [`Executor::query`].
    async fn query_unbuffered(&self, command: &Command) -> Result<RowStream, ExecError> {
        let set = self.query(command).await?;

        Ok(stream::iter(set.into_rows().into_iter().map(Ok)).boxed())
    }

    /// Run a command producing several ordered result sets.
    async fn query_multiple(
        &self,
        command: &Command,
    ) -> Result<Box<dyn ResultSetCursor>, ExecError>;

    /// Run a command for its affected row count.
    async fn execute(&self, command: &Command) -> Result<u64, ExecError>;

    /// Prepare a command whose reader outlives this call.
    async fn prepare(&mut self, command: Command) -> Result<Box<dyn PreparedCommand>, ExecError>;
}

///
/// ResultSetCursor
/// Ordered cursor over the result sets of one execution.
///

#[async_trait]
pub trait ResultSetCursor: Send {
    /// Advance to the next result set; `None` once all are consumed.
    async fn next_set(&mut self) -> Result<Option<RowSet>, ExecError>;

    /// Release the cursor. Called exactly once by the pipeline.
    async fn close(&mut self) -> Result<(), ExecError> {
        Ok(())
    }
}

///
/// ReadBehavior
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReadBehavior {
    #[default]
    Default,
    /// Columns are read in order and large values are streamed, not buffered.
    SequentialAccess,
}

///
/// PreparedCommand
///

#[async_trait]
pub trait PreparedCommand: Send {
    async fn execute_reader(
        &mut self,
        behavior: ReadBehavior,
    ) -> Result<Box<dyn DataReader>, ExecError>;
}

///
/// DataReader
/// Forward-only reader positioned before the first row.
///

#[async_trait]
pub trait DataReader: Send {
    /// Advance to the next row; `false` when there are no more rows.
    async fn read(&mut self) -> Result<bool, ExecError>;

    fn is_null(&self, ordinal: usize) -> Result<bool, ExecError>;

    /// Stream the current row's column at `ordinal`.
    fn take_stream(&mut self, ordinal: usize) -> Result<BlobStream, ExecError>;
}
