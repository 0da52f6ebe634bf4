//! `PostgreSQL` board store built on Diesel and r2d2.

use super::{models::NewColumnRow, schema::board_columns, transaction::PgBoardTransaction};
use crate::board::{
    domain::DEFAULT_COLUMNS,
    ports::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use tracing::{Span, info};

/// `PostgreSQL` connection pool type used by the board store.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema bootstrap, idempotent.
const BOARD_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-16-000000_create_board/up.sql");

/// Conflicts with itself and with plain row writes, not with readers.
const LOCK_TASKS_SQL: &str = "LOCK TABLE tasks IN SHARE ROW EXCLUSIVE MODE";

const LOCK_COLUMNS_SQL: &str = "LOCK TABLE columns IN SHARE ROW EXCLUSIVE MODE";

/// `PostgreSQL`-backed board store.
///
/// Every unit of work runs on the blocking thread pool. Writes take a
/// table lock on `tasks` at the start of the transaction so concurrent
/// writers queue behind one another; reads run in a read-only
/// repeatable-read transaction and never block on writers.
#[derive(Debug, Clone)]
pub struct PostgresBoardStore {
    pool: BoardPgPool,
}

impl PostgresBoardStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the pool cannot be
    /// built.
    pub fn connect(database_url: &str, max_size: u32) -> BoardStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(BoardStoreError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut connection = pool.get().map_err(BoardStoreError::persistence)?;
            f(&mut *connection)
        })
        .await
        .map_err(BoardStoreError::persistence)?
    }
}

/// Why a Diesel transaction closure bailed out.
enum Abort<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for Abort<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl<E> Abort<E>
where
    E: From<BoardStoreError>,
{
    fn into_error(self) -> E {
        match self {
            Self::Work(err) => err,
            Self::Database(err) => E::from(BoardStoreError::persistence(err)),
        }
    }
}

#[async_trait]
impl BoardStore for PostgresBoardStore {
    async fn initialize(&self) -> BoardStoreResult<()> {
        let seeded = self
            .run_blocking(|connection| {
                connection
                    .transaction::<usize, DieselError, _>(|tx_conn| {
                        tx_conn.batch_execute(BOARD_SCHEMA_SQL)?;
                        diesel::sql_query(LOCK_COLUMNS_SQL).execute(tx_conn)?;
                        let existing: i64 = board_columns::table.count().get_result(tx_conn)?;
                        if existing > 0 {
                            return Ok(0);
                        }
                        let rows: Vec<NewColumnRow<'_>> = DEFAULT_COLUMNS
                            .iter()
                            .map(|(name, ord)| NewColumnRow { name: *name, ord: *ord })
                            .collect();
                        diesel::insert_into(board_columns::table)
                            .values(&rows)
                            .execute(tx_conn)
                    })
                    .map_err(BoardStoreError::persistence)
            })
            .await?;
        if seeded > 0 {
            info!(columns = seeded, "seeded default columns");
        }
        Ok(())
    }

    async fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<T, Abort<E>, _>(|tx_conn| {
                    let mut tx = PgBoardTransaction::new(tx_conn);
                    work(&mut tx).map_err(Abort::Work)
                })
                .map_err(Abort::into_error)
        })
        .await
    }

    async fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            connection
                .transaction::<T, Abort<E>, _>(|tx_conn| {
                    diesel::sql_query(LOCK_TASKS_SQL).execute(tx_conn)?;
                    let mut tx = PgBoardTransaction::new(tx_conn);
                    work(&mut tx).map_err(Abort::Work)
                })
                .map_err(Abort::into_error)
        })
        .await
    }
}
