/// Error type for every operation in this crate
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Query, transaction or driver failure reported by SeaORM
    #[error("SQL error: {0}")]
    Sql(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    /// Misuse of the data-access API, e.g. a value query without a projection
    #[error("Database error: {0}")]
    Generic(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
