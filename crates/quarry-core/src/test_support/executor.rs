use crate::{
    exec::{
        BlobStream, DataReader, ExecError, Executor, PreparedCommand, ReadBehavior,
        ResultSetCursor, RowStream,
    },
    query::Command,
    row::RowSet,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::{
    collections::VecDeque,
    io,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

///
/// Blob
/// Scripted first cell of a stream query.
///

#[derive(Clone, Debug, Default)]
pub enum Blob {
    #[default]
    NoRows,
    Null,
    Bytes(Vec<u8>),
}

type Events = Arc<Mutex<Vec<&'static str>>>;

fn log(events: &Events, event: &'static str) {
    events.lock().expect("event log").push(event);
}

///
/// StubExecutor
///
/// Scripted executor that counts calls and records every command.
/// Drops of stream resources and cursor closes are appended to `events`.
///

#[derive(Default)]
pub struct StubExecutor {
    calls: AtomicUsize,
    commands: Mutex<Vec<Command>>,
    rows: RowSet,
    sets: Vec<RowSet>,
    affected: u64,
    blob: Blob,
    fail: bool,
    fail_reads: bool,
    hang: bool,
    closed: bool,
    opens: AtomicUsize,
    events: Events,
    open: AtomicBool,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, rows: RowSet) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_sets(mut self, sets: Vec<RowSet>) -> Self {
        self.sets = sets;
        self
    }

    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub fn with_blob(mut self, blob: Blob) -> Self {
        self.blob = blob;
        self
    }

    /// Every call fails with a connection error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Stream readers fail on `read`.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Every call stays pending until dropped.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Starts with the connection closed.
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().expect("command log").clone()
    }

    pub fn last_command(&self) -> Command {
        self.commands().pop().expect("at least one command should run")
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().expect("event log").clone()
    }

    async fn begin(&self, command: &Command) -> Result<(), ExecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.commands
            .lock()
            .expect("command log")
            .push(command.clone());

        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Executor for StubExecutor {
    fn database(&self) -> &str {
        "stubdb"
    }

    fn is_open(&self) -> bool {
        !self.closed || self.open.load(Ordering::SeqCst)
    }

    async fn open(&mut self) -> Result<(), ExecError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, command: &Command) -> Result<RowSet, ExecError> {
        self.begin(command).await?;

        Ok(self.rows.clone())
    }

    async fn query_unbuffered(&self, command: &Command) -> Result<RowStream, ExecError> {
        self.begin(command).await?;
        log(&self.events, "unbuffered");

        Ok(stream::iter(self.rows.clone().into_rows().into_iter().map(Ok)).boxed())
    }

    async fn query_multiple(
        &self,
        command: &Command,
    ) -> Result<Box<dyn ResultSetCursor>, ExecError> {
        self.begin(command).await?;

        Ok(Box::new(StubCursor {
            sets: self.sets.clone().into(),
            events: Arc::clone(&self.events),
        }))
    }

    async fn execute(&self, command: &Command) -> Result<u64, ExecError> {
        self.begin(command).await?;

        Ok(self.affected)
    }

    async fn prepare(&mut self, command: Command) -> Result<Box<dyn PreparedCommand>, ExecError> {
        self.begin(&command).await?;

        Ok(Box::new(StubCommand {
            blob: self.blob.clone(),
            fail_reads: self.fail_reads,
            events: Arc::clone(&self.events),
        }))
    }
}

//
// Cursor
//

struct StubCursor {
    sets: VecDeque<RowSet>,
    events: Events,
}

#[async_trait]
impl ResultSetCursor for StubCursor {
    async fn next_set(&mut self) -> Result<Option<RowSet>, ExecError> {
        Ok(self.sets.pop_front())
    }

    async fn close(&mut self) -> Result<(), ExecError> {
        log(&self.events, "cursor closed");
        Ok(())
    }
}

//
// Stream resources
//

struct StubCommand {
    blob: Blob,
    fail_reads: bool,
    events: Events,
}

#[async_trait]
impl PreparedCommand for StubCommand {
    async fn execute_reader(
        &mut self,
        behavior: ReadBehavior,
    ) -> Result<Box<dyn DataReader>, ExecError> {
        assert_eq!(behavior, ReadBehavior::SequentialAccess);

        Ok(Box::new(StubReader {
            blob: self.blob.clone(),
            fail_reads: self.fail_reads,
            consumed: false,
            events: Arc::clone(&self.events),
        }))
    }
}

impl Drop for StubCommand {
    fn drop(&mut self) {
        log(&self.events, "command dropped");
    }
}

struct StubReader {
    blob: Blob,
    fail_reads: bool,
    consumed: bool,
    events: Events,
}

#[async_trait]
impl DataReader for StubReader {
    async fn read(&mut self) -> Result<bool, ExecError> {
        if self.fail_reads {
            return Err("reader failed".into());
        }
        if self.consumed {
            return Ok(false);
        }
        self.consumed = true;

        Ok(!matches!(self.blob, Blob::NoRows))
    }

    fn is_null(&self, _ordinal: usize) -> Result<bool, ExecError> {
        Ok(matches!(self.blob, Blob::Null))
    }

    fn take_stream(&mut self, _ordinal: usize) -> Result<BlobStream, ExecError> {
        let Blob::Bytes(bytes) = std::mem::take(&mut self.blob) else {
            return Err("no binary value on the current row".into());
        };

        Ok(Box::new(StubBlob {
            bytes: io::Cursor::new(bytes),
            events: Arc::clone(&self.events),
        }))
    }
}

impl Drop for StubReader {
    fn drop(&mut self) {
        log(&self.events, "reader dropped");
    }
}

struct StubBlob {
    bytes: io::Cursor<Vec<u8>>,
    events: Events,
}

impl AsyncRead for StubBlob {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.bytes).poll_read(cx, buf)
    }
}

impl Drop for StubBlob {
    fn drop(&mut self) {
        log(&self.events, "stream dropped");
    }
}
