//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use kanban::board::{
    adapters::postgres::PostgresBoardStore,
    domain::{Column, Task},
    ports::BoardStore,
    services::{CreateTaskRequest, OrderingEngine},
};
use rstest::fixture;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Boxed error type for test results.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the server used by these tests.
pub const TEST_DATABASE_URL_ENV: &str = "KANBAN_TEST_DATABASE_URL";

/// Pins every pooled connection to one schema.
#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// An initialized store isolated in a throwaway schema.
pub struct PreparedStore {
    pub rt: Runtime,
    pub engine: OrderingEngine<PostgresBoardStore>,
    url: String,
    schema: String,
}

impl PreparedStore {
    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<PostgresBoardStore> {
        self.engine.store()
    }

    /// Looks up a seeded column by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails or no column has that name.
    pub fn column(&self, name: &str) -> Result<Column, BoxError> {
        let board = self.rt.block_on(self.engine.list_board())?;
        board
            .columns()
            .iter()
            .find(|column| column.name() == name)
            .cloned()
            .ok_or_else(|| format!("no column named {name}").into())
    }

    /// Creates tasks at the end of a named column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or any creation fails.
    pub fn seed(&self, column: &str, titles: &[&str]) -> Result<Vec<Task>, BoxError> {
        let col_id = self.column(column)?.id().value();
        let mut created = Vec::with_capacity(titles.len());
        for title in titles {
            created.push(
                self.rt
                    .block_on(self.engine.create_task(CreateTaskRequest::new(col_id, *title)))?,
            );
        }
        Ok(created)
    }

    /// Returns `(title, ord)` pairs of a named column in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails or the column is unknown.
    pub fn layout(&self, column: &str) -> Result<Vec<(String, i32)>, BoxError> {
        let col_id = self.column(column)?.id();
        let board = self.rt.block_on(self.engine.list_board())?;
        Ok(board
            .column_tasks(col_id)
            .iter()
            .map(|task| (task.title().to_owned(), task.ord().value()))
            .collect())
    }

    /// Opens a direct connection pinned to the test schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        let mut conn = PgConnection::establish(&self.url)?;
        conn.batch_execute(&format!("SET search_path TO {}", self.schema))?;
        Ok(conn)
    }
}

impl Drop for PreparedStore {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.url)
            .map_err(BoxError::from)
            .and_then(|mut conn| {
                conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
                    .map_err(BoxError::from)
            });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Resolves the server URL used by these tests.
///
/// # Errors
///
/// Returns an error naming [`TEST_DATABASE_URL_ENV`] when it is unset or blank.
pub fn test_database_url(lookup: impl Fn(&str) -> Option<String>) -> Result<String, BoxError> {
    lookup(TEST_DATABASE_URL_ENV)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            format!("{TEST_DATABASE_URL_ENV} must name a PostgreSQL server for these tests").into()
        })
}

/// Creates a schema, a pool pinned to it, and an initialized store.
///
/// # Errors
///
/// Returns an error if no test database is configured or any setup step
/// fails.
pub fn prepare_store(pool_size: u32) -> Result<PreparedStore, BoxError> {
    let url = test_database_url(|key| std::env::var(key).ok())?;
    let schema = format!("kanban_test_{}", Uuid::new_v4().simple());
    PgConnection::establish(&url)?.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

    let pool = Pool::builder()
        .max_size(pool_size)
        .connection_customizer(Box::new(SearchPath(schema.clone())))
        .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
    let rt = test_runtime()?;
    let store = Arc::new(PostgresBoardStore::new(pool));
    let prepared = PreparedStore {
        rt,
        engine: OrderingEngine::new(Arc::clone(&store)),
        url,
        schema,
    };
    prepared.rt.block_on(store.initialize())?;
    Ok(prepared)
}

/// Fixture yielding a prepared store with a small pool.
///
/// # Errors
///
/// Returns an error if any setup step fails.
#[fixture]
pub fn prepared_store() -> Result<PreparedStore, BoxError> {
    prepare_store(4)
}
