//! Query dispatch pipeline.
//!
//! Every operation runs the same steps: validate facets, consult the cache,
//! register the result type, resolve command kind / timeout / buffering,
//! execute, fill the cache and report timing.

mod builder;
mod rows;


pub use builder::ConnectionBuilder;
pub use rows::Rows;

use crate::{
    args::Arguments,
    cache::QueryCache,
    cancel::CancellationToken,
    config::ConnectionOptions,
    error::Error,
    exec::{Executor, ReadBehavior, RowStream},
    lifecycle::{DbStream, ResourceSet},
    mapping::{TypeRegistry, materialize, materialize_first},
    obs::{self, QueryExecuted, QueryObserver},
    query::{
        AllQuery, ByColumnQuery, Cardinality, Command, CommandKind, Facets, GridReader, MapQuery,
        MultipleQuery, RowParts, Segments, SqlQuery, StreamQuery,
    },
    row::RowView,
    traits::FromRow,
    value::Value,
};
use futures::stream::StreamExt;
use std::{any::type_name, sync::Arc, time::Instant};
use tracing::{debug, trace, warn};

///
/// Connection
///
/// Typed query façade over one [`Executor`].
///
/// All operations except [`Connection::open_stream`] take `&self` and a
/// cancellation token; cancelling aborts the in-flight executor call.
///

pub struct Connection<E> {
    executor: E,
    cache: Arc<dyn QueryCache>,
    observer: Arc<dyn QueryObserver>,
    registry: &'static TypeRegistry,
    options: ConnectionOptions,
}

impl<E: Executor> Connection<E> {
    /// Connection with default collaborators.
    pub fn new(executor: E) -> Self {
        ConnectionBuilder::new().build(executor)
    }

    /// The underlying executor.
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    pub const fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    // ------------------------------------------------------------------
    // Single-row queries
    // ------------------------------------------------------------------

    /// First row of the result; `NotFound` when there are none.
    pub async fn query_first<Q: SqlQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Q::Output, Error> {
        self.single(query, Cardinality::First, cancel)
            .await?
            .ok_or(Error::NotFound {
                result_type: type_name::<Q::Output>(),
            })
    }

    pub async fn query_first_or_default<Q: SqlQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Option<Q::Output>, Error> {
        self.single(query, Cardinality::FirstOrDefault, cancel).await
    }

    /// The only row of the result; errors on zero or several rows.
    pub async fn query_single<Q: SqlQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Q::Output, Error> {
        self.single(query, Cardinality::Single, cancel)
            .await?
            .ok_or(Error::NotFound {
                result_type: type_name::<Q::Output>(),
            })
    }

    pub async fn query_single_or_default<Q: SqlQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Option<Q::Output>, Error> {
        self.single(query, Cardinality::SingleOrDefault, cancel).await
    }

    // ------------------------------------------------------------------
    // Multi-row queries
    // ------------------------------------------------------------------

    /// All rows, buffered unless the query is unbuffered.
    pub async fn query<Q: SqlQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Rows<'static, Q::Output>, Error> {
        let facets = query.facets();
        facets.validate()?;

        if let Some(hit) = self.cached::<Vec<Q::Output>>(&facets).await {
            return Ok(Rows::Buffered(hit));
        }

        self.registry.ensure_registered::<Q::Output>();
        let command = self.command(query.sql(), query.arguments(), &facets);
        let started = Instant::now();

        let rows = if facets.is_buffered() {
            let set = cancel.guard(self.executor.query(&command)).await?;
            let items: Vec<Q::Output> = materialize(self.registry, &set)?;
            self.fill(&facets, &items).await;

            Rows::Buffered(items)
        } else {
            let stream = cancel.guard(self.executor.query_unbuffered(&command)).await?;

            Rows::Streaming(map_rows::<Q::Output>(stream, self.registry))
        };

        self.report(type_name::<Q>(), type_name::<Q::Output>(), &command, started);

        Ok(rows)
    }

    /// Rows split into two or three parts and combined by the query.
    pub async fn query_map<'q, Q: MapQuery>(
        &self,
        query: &'q Q,
        cancel: &CancellationToken,
    ) -> Result<Rows<'q, Q::Output>, Error> {
        let facets = query.facets();
        facets.validate()?;

        if let Some(hit) = self.cached::<Vec<Q::Output>>(&facets).await {
            return Ok(Rows::Buffered(hit));
        }

        Q::Parts::ensure_registered(self.registry);
        let command = self.command(query.sql(), query.arguments(), &facets);
        let started = Instant::now();

        let rows = if facets.is_buffered() {
            let set = cancel.guard(self.executor.query(&command)).await?;

            // Split columns are only required once a row exists.
            let items = if set.is_empty() {
                Vec::new()
            } else {
                let segments =
                    Segments::plan::<Q::Parts>(self.registry, set.columns(), query.split_on())?;

                set.iter()
                    .map(|row| {
                        Q::Parts::from_segments(row, &segments).map(|parts| query.map(parts))
                    })
                    .collect::<Result<Vec<_>, _>>()?
            };
            self.fill(&facets, &items).await;

            Rows::Buffered(items)
        } else {
            let stream = cancel.guard(self.executor.query_unbuffered(&command)).await?;
            let registry = self.registry;
            let split_on = query.split_on();
            let mut planned: Option<Segments> = None;

            Rows::Streaming(
                stream
                    .map(move |row| {
                        let row = row.map_err(Error::Execution)?;
                        let segments = match planned.take() {
                            Some(segments) => segments,
                            None => Segments::plan::<Q::Parts>(registry, row.columns(), split_on)?,
                        };
                        let mapped = Q::Parts::from_segments(&row, &segments);
                        planned = Some(segments);

                        mapped.map(|parts| query.map(parts))
                    })
                    .boxed(),
            )
        };

        self.report(type_name::<Q>(), type_name::<Q::Output>(), &command, started);

        Ok(rows)
    }

    /// One value assembled from several result sets.
    ///
    /// The cursor is closed before returning, whether or not assembly
    /// succeeded; an assembly error takes precedence over a close error.
    /// Set types register as the [`GridReader`] reads them.
    pub async fn query_multiple<Q: MultipleQuery>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> Result<Q::Output, Error> {
        let facets = query.facets();
        facets.validate()?;

        if let Some(hit) = self.cached::<Q::Output>(&facets).await {
            return Ok(hit);
        }

        let command = self.command(query.sql(), query.arguments(), &facets);
        let started = Instant::now();

        let mut cursor = cancel.guard(self.executor.query_multiple(&command)).await?;
        let assembled = {
            let mut grid = GridReader::new(cursor.as_mut(), self.registry, cancel);
            query.assemble(&mut grid).await
        };
        let closed = cursor.close().await.map_err(Error::Execution);

        let value = assembled?;
        closed?;

        self.fill(&facets, &value).await;
        self.report(type_name::<Q>(), type_name::<Q::Output>(), &command, started);

        Ok(value)
    }

    // ------------------------------------------------------------------
    // Streams
    // ------------------------------------------------------------------

    /// Open the first column of the first row as a live byte stream.
    ///
    /// Returns `None` when there are no rows or the value is NULL. The stream
    /// borrows the connection exclusively until dropped; command and reader
    /// are released with it, and on every failure path.
    pub async fn open_stream<Q: StreamQuery>(
        &mut self,
        query: &Q,
    ) -> Result<Option<DbStream<'_>>, Error> {
        let facets = query.facets();
        facets.validate_for_stream()?;

        let started = Instant::now();
        if !self.executor.is_open() {
            self.executor.open().await.map_err(Error::Execution)?;
        }

        let command = self.command(query.sql(), query.arguments(), &facets);
        let mut resources = ResourceSet::new();

        let mut prepared = self
            .executor
            .prepare(command.clone())
            .await
            .map_err(Error::Execution)?;
        let mut reader = prepared
            .execute_reader(ReadBehavior::SequentialAccess)
            .await
            .map_err(Error::Execution)?;
        resources.track(prepared);

        let has_value = reader.read().await.map_err(Error::Execution)?
            && !reader.is_null(0).map_err(Error::Execution)?;
        if !has_value {
            trace!(sql = %command.text, "stream query returned no value");
            return Ok(None);
        }

        let stream = reader.take_stream(0).map_err(Error::Execution)?;
        resources.track(reader);
        debug!(sql = %command.text, "opened database stream");

        self.report(type_name::<Q>(), type_name::<DbStream<'static>>(), &command, started);

        Ok(Some(DbStream::new(stream, resources)))
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Run a statement for its affected row count. Never cached.
    pub async fn execute<Q>(&self, query: &Q, cancel: &CancellationToken) -> Result<u64, Error>
    where
        Q: SqlQuery<Output = u64>,
    {
        let facets = query.facets();
        let command = self.command(query.sql(), query.arguments(), &facets);
        let started = Instant::now();

        let affected = cancel.guard(self.executor.execute(&command)).await?;
        self.report(type_name::<Q>(), type_name::<u64>(), &command, started);

        Ok(affected)
    }

    /// Run `{schema}.{name}` as a stored procedure, discarding its rows.
    pub async fn execute_stored_proc(
        &self,
        schema: &str,
        name: &str,
        arguments: Arguments,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let command = self.procedure(schema, name, arguments);
        let started = Instant::now();

        cancel.guard(self.executor.execute(&command)).await?;
        self.report("stored_procedure", "()", &command, started);

        Ok(())
    }

    /// Run `{schema}.{name}` as a stored procedure and map its rows.
    pub async fn execute_stored_proc_rows<T: FromRow>(
        &self,
        schema: &str,
        name: &str,
        arguments: Arguments,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, Error> {
        self.registry.ensure_registered::<T>();
        let command = self.procedure(schema, name, arguments);
        let started = Instant::now();

        let set = cancel.guard(self.executor.query(&command)).await?;
        let items = materialize(self.registry, &set)?;
        self.report("stored_procedure", type_name::<T>(), &command, started);

        Ok(items)
    }

    // ------------------------------------------------------------------
    // Convenience queries
    // ------------------------------------------------------------------

    /// Rows whose column for `member` equals `value` (at most 1000).
    ///
    /// A NULL value matches nothing and returns without executing.
    pub async fn query_by<T: FromRow>(
        &self,
        member: &str,
        value: impl Into<Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, Error> {
        let value = value.into();
        if value.is_null() {
            return Ok(Vec::new());
        }

        let query = ByColumnQuery::<T>::new(member, value)?;

        self.query(&query, cancel).await?.collect().await
    }

    /// Every row of `T`'s table, optionally capped at `max_rows`.
    pub async fn get_all<T: FromRow>(
        &self,
        max_rows: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, Error> {
        let query = AllQuery::<T>::new(max_rows)?;

        self.query(&query, cancel).await?.collect().await
    }

    // ------------------------------------------------------------------
    // Pipeline steps
    // ------------------------------------------------------------------

    async fn single<Q: SqlQuery>(
        &self,
        query: &Q,
        cardinality: Cardinality,
        cancel: &CancellationToken,
    ) -> Result<Option<Q::Output>, Error> {
        let facets = query.facets();
        facets.validate()?;

        if let Some(hit) = self.cached::<Q::Output>(&facets).await {
            return Ok(Some(hit));
        }

        self.registry.ensure_registered::<Q::Output>();
        let command = self.command(query.sql(), query.arguments(), &facets);
        let started = Instant::now();

        let set = cancel.guard(self.executor.query(&command)).await?;
        cardinality.check::<Q::Output>(set.len())?;
        let value = materialize_first::<Q::Output>(self.registry, &set)?;

        if let Some(value) = &value {
            self.fill(&facets, value).await;
        }
        trace!(read = cardinality.label(), found = value.is_some(), "single-row query");
        self.report(type_name::<Q>(), type_name::<Q::Output>(), &command, started);

        Ok(value)
    }

    fn command(&self, sql: &str, arguments: Arguments, facets: &Facets) -> Command {
        Command::new(sql, arguments)
            .with_timeout(facets.resolve_timeout(self.options.command_timeout()))
            .with_buffering(facets.buffering)
    }

    fn procedure(&self, schema: &str, name: &str, arguments: Arguments) -> Command {
        Command::new(format!("{schema}.{name}"), arguments)
            .with_kind(CommandKind::StoredProcedure)
            .with_timeout(self.options.command_timeout())
    }

    async fn cached<T: Clone + Send + Sync + 'static>(&self, facets: &Facets) -> Option<T> {
        let policy = facets.cache.as_ref()?;
        let hit = self.cache.try_get(policy).await;

        match hit.as_deref().map(|value| value.downcast_ref::<T>()) {
            Some(Some(value)) => {
                trace!(key = policy.key(), "cache hit");
                Some(value.clone())
            }
            Some(None) => {
                warn!(
                    key = policy.key(),
                    expected = type_name::<T>(),
                    "cached value has another type; treating as a miss"
                );
                None
            }
            None => {
                trace!(key = policy.key(), "cache miss");
                None
            }
        }
    }

    async fn fill<T: Clone + Send + Sync + 'static>(&self, facets: &Facets, value: &T) {
        if let Some(policy) = &facets.cache {
            self.cache.set(policy, Arc::new(value.clone())).await;
        }
    }

    fn report(
        &self,
        query_type: &'static str,
        result_type: &'static str,
        command: &Command,
        started: Instant,
    ) {
        let event = QueryExecuted {
            query_type,
            result_type,
            sql: command.text.clone(),
            arguments: command.arguments.clone(),
            database: self.executor.database().to_string(),
            duration: started.elapsed(),
        };

        obs::report(self.observer.as_ref(), &event);
    }
}

// Bindings are resolved from the first row's columns and reused.
fn map_rows<T: FromRow>(
    rows: RowStream,
    registry: &'static TypeRegistry,
) -> futures::stream::BoxStream<'static, Result<T, Error>> {
    let mut binding = None;

    rows.map(move |row| {
        let row = row.map_err(Error::Execution)?;
        let binding = binding.get_or_insert_with(|| registry.binding_for::<T>(row.columns()));

        T::from_row(RowView::new(row.columns(), row.values(), binding.as_ref()))
    })
    .boxed()
}
