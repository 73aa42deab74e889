/// Error type for data-access operations
#[derive(Debug, thiserror::Error)]
pub enum DataAccessError {
    #[error("Session is closed")]
    SessionClosed,

    #[error("No active transaction for this session")]
    NoActiveTransaction,

    #[error("Transaction commit failed: {0}")]
    CommitFailed(#[source] sqlx::Error),

    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(#[source] sqlx::Error),

    #[error("Query over {table} matched more than one row")]
    NonUniqueResult { table: &'static str },

    #[error("Entity of {table} has no persistent identifier")]
    TransientEntity { table: &'static str },

    #[error("No row in {table} matched the entity identifier")]
    StaleEntity { table: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for data-access operations
pub type DataAccessResult<T> = Result<T, DataAccessError>;
