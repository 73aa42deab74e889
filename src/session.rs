use std::future::Future;
use std::sync::Arc;

use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

use crate::config::DatabaseConfig;
use crate::error::{DataAccessError, DataAccessResult};
use crate::predicate::SqlValue;
use crate::unit_of_work::UnitOfWork;

/// Builds the connection pool once and hands out sessions.
///
/// The factory is constructed explicitly by the host and shared by
/// reference; there is no process-wide instance.
pub struct SessionFactory {
    pool: Arc<PgPool>,
}

impl SessionFactory {
    /// Build the pool from explicit settings. Call once and share the
    /// factory for the life of the process.
    pub async fn connect(config: &DatabaseConfig) -> DataAccessResult<Self> {
        let pool = config.pool_options().connect(&config.url).await?;
        tracing::info!(max_connections = config.max_connections, "session factory connected");
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Wrap a pool the host application already owns.
    pub fn from_pool(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a pool-backed session.
    ///
    /// Each statement issued through it commits on its own. Use
    /// [`begin`](Self::begin) when several operations must succeed or
    /// fail together.
    pub fn open_session(&self) -> Session {
        Session::pooled(self.pool.clone())
    }

    /// Begin a transaction and return the unit of work owning it.
    pub async fn begin(&self) -> DataAccessResult<UnitOfWork> {
        let tx = self.pool.begin().await?;
        tracing::debug!("transaction started");
        Ok(UnitOfWork::new(Session::transactional(tx)))
    }

    /// Run `f` inside a unit of work: commit when it returns `Ok`,
    /// roll back and re-surface the error when it returns `Err`.
    ///
    /// The terminal action is guaranteed on every exit path of `f`.
    pub async fn run_unit_of_work<T, F, Fut>(&self, f: F) -> DataAccessResult<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = DataAccessResult<T>>,
    {
        let uow = self.begin().await?;
        let session = uow.session();
        match f(session).await {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback of failed unit of work also failed");
                }
                Err(err)
            }
        }
    }
}

enum SessionInner {
    Pool(Arc<PgPool>),
    Tx(Transaction<'static, Postgres>),
}

/// Handle to one work context against the database.
///
/// Cloning is cheap; clones share the same underlying connection slot,
/// so repositories created from the same session see the same
/// transaction. A session whose transaction has ended is closed and
/// answers every operation with [`DataAccessError::SessionClosed`].
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Option<SessionInner>>>,
}

impl Session {
    fn pooled(pool: Arc<PgPool>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(SessionInner::Pool(pool)))),
        }
    }

    pub(crate) fn transactional(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(SessionInner::Tx(tx)))),
        }
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Close the session. A live transaction is rolled back when the
    /// underlying handle drops.
    pub async fn close(&self) {
        self.inner.lock().await.take();
    }

    /// Takes ownership of the transaction, leaving the session closed.
    /// This should only be called when committing or rolling back.
    pub(crate) async fn take_transaction(
        &self,
    ) -> DataAccessResult<Transaction<'static, Postgres>> {
        let mut guard = self.inner.lock().await;
        match guard.take() {
            Some(SessionInner::Tx(tx)) => Ok(tx),
            Some(pooled) => {
                *guard = Some(pooled);
                Err(DataAccessError::NoActiveTransaction)
            }
            None => Err(DataAccessError::NoActiveTransaction),
        }
    }

    /// Fetch every row produced by `sql`.
    pub async fn fetch_all(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> DataAccessResult<Vec<PgRow>> {
        let mut guard = self.inner.lock().await;
        match guard.as_mut().ok_or(DataAccessError::SessionClosed)? {
            SessionInner::Pool(pool) => Ok(build_query(sql, params).fetch_all(&**pool).await?),
            SessionInner::Tx(tx) => Ok(build_query(sql, params).fetch_all(&mut **tx).await?),
        }
    }

    /// Fetch at most one row.
    pub async fn fetch_optional(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> DataAccessResult<Option<PgRow>> {
        let mut guard = self.inner.lock().await;
        match guard.as_mut().ok_or(DataAccessError::SessionClosed)? {
            SessionInner::Pool(pool) => {
                Ok(build_query(sql, params).fetch_optional(&**pool).await?)
            }
            SessionInner::Tx(tx) => {
                Ok(build_query(sql, params).fetch_optional(&mut **tx).await?)
            }
        }
    }

    /// Fetch exactly one row.
    pub async fn fetch_one(&self, sql: &str, params: Vec<SqlValue>) -> DataAccessResult<PgRow> {
        let mut guard = self.inner.lock().await;
        match guard.as_mut().ok_or(DataAccessError::SessionClosed)? {
            SessionInner::Pool(pool) => Ok(build_query(sql, params).fetch_one(&**pool).await?),
            SessionInner::Tx(tx) => Ok(build_query(sql, params).fetch_one(&mut **tx).await?),
        }
    }

    /// Execute a statement, returning the number of affected rows.
    pub async fn execute(&self, sql: &str, params: Vec<SqlValue>) -> DataAccessResult<u64> {
        let mut guard = self.inner.lock().await;
        match guard.as_mut().ok_or(DataAccessError::SessionClosed)? {
            SessionInner::Pool(pool) => {
                Ok(build_query(sql, params).execute(&**pool).await?.rows_affected())
            }
            SessionInner::Tx(tx) => {
                Ok(build_query(sql, params).execute(&mut **tx).await?.rows_affected())
            }
        }
    }
}

fn build_query<'q>(
    sql: &'q str,
    params: Vec<SqlValue>,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for value in params {
        query = value.bind_to(query);
    }
    query
}
