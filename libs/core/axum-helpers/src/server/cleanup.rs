//! Connection cleanup run during graceful shutdown.

use tracing::{error, info};

/// Closes the pool so in-flight connections are returned before exit.
pub async fn close_database(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(()) => info!(name, "Database connection closed"),
        Err(e) => error!(name, error = %e, "Error closing database connection"),
    }
}
