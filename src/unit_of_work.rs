use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{DataAccessError, DataAccessResult};
use crate::session::Session;

/// Trait for components that need to be notified when a unit of work
/// reaches its terminal state.
///
/// Components implementing this trait can be registered with a
/// [`UnitOfWork`] to receive a callback after the transaction is
/// committed or rolled back, e.g. to invalidate caches or flush
/// buffered side effects.
#[async_trait]
pub trait TransactionAware: Send + Sync {
    /// Called after a successful commit.
    async fn on_commit(&self) -> DataAccessResult<()>;

    /// Called after a rollback.
    async fn on_rollback(&self) -> DataAccessResult<()>;
}

/// One transaction scoped to one session.
///
/// `commit` and `rollback` consume the value, so each unit of work
/// reaches its terminal state at most once; its session is closed
/// afterwards. Dropping a unit of work without a terminal action rolls
/// the transaction back.
pub struct UnitOfWork {
    session: Session,
    observers: Arc<RwLock<Vec<Arc<dyn TransactionAware>>>>,
}

impl UnitOfWork {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Handle to this unit of work's session, for constructing
    /// repositories that take part in the transaction.
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    /// Register a component to be notified when the transaction ends.
    pub fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    /// Commit the transaction and notify observers.
    ///
    /// When the commit itself fails the transaction ends rolled back:
    /// observers see `on_rollback`, and the commit failure is returned
    /// to the caller. The session is closed on every path.
    pub async fn commit(self) -> DataAccessResult<()> {
        let tx = self.session.take_transaction().await?;
        match tx.commit().await {
            Ok(()) => {
                tracing::debug!("transaction committed");
                let observers = self.observers.read().clone();
                for observer in observers.iter() {
                    observer.on_commit().await?;
                }
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "commit failed, transaction rolled back");
                let observers = self.observers.read().clone();
                for observer in observers.iter() {
                    if let Err(observer_err) = observer.on_rollback().await {
                        tracing::warn!(
                            error = %observer_err,
                            "observer failed during rollback notification"
                        );
                    }
                }
                Err(DataAccessError::CommitFailed(err))
            }
        }
    }

    /// Roll back the transaction and notify observers.
    ///
    /// A rollback failure propagates directly.
    pub async fn rollback(self) -> DataAccessResult<()> {
        let tx = self.session.take_transaction().await?;
        tx.rollback().await.map_err(DataAccessError::RollbackFailed)?;
        tracing::debug!("transaction rolled back");
        let observers = self.observers.read().clone();
        for observer in observers.iter() {
            observer.on_rollback().await?;
        }
        Ok(())
    }
}
