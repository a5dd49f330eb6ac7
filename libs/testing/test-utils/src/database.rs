//! Migrated in-memory SQLite for fast, isolated tests.

use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::SqliteQueryBuilder;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const SQLITE_MEMORY: &str = "sqlite::memory:";

/// Database handle that lives as long as the test.
///
/// Every `TestDatabase` is its own database, so tests never see each
/// other's rows.
pub struct TestDatabase {
    pub connection: DatabaseConnection,
    pub connection_string: String,
    #[cfg(feature = "postgres")]
    pub(crate) container:
        Option<testcontainers::ContainerAsync<testcontainers_modules::postgres::Postgres>>,
}

impl TestDatabase {
    /// In-memory SQLite with all catalog migrations applied
    ///
    /// ```ignore
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let service = ProductService::new(db.connection());
    /// # }
    /// ```
    pub async fn new() -> Self {
        let db = Self::empty().await;
        Migrator::up(&db.connection, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    /// In-memory SQLite without any tables
    pub async fn empty() -> Self {
        // One pinned connection: every new SQLite connection would open a
        // fresh in-memory database.
        let mut options = ConnectOptions::new(SQLITE_MEMORY);
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let connection = Database::connect(options)
            .await
            .expect("Failed to open in-memory SQLite");

        Self::from_parts(connection, SQLITE_MEMORY.to_string())
    }

    pub(crate) fn from_parts(connection: DatabaseConnection, connection_string: String) -> Self {
        Self {
            connection,
            connection_string,
            #[cfg(feature = "postgres")]
            container: None,
        }
    }

    /// Creates the table for an ad-hoc entity defined inside a test.
    pub async fn create_table<E: EntityTrait>(&self, entity: E) {
        let schema = Schema::new(self.connection.get_database_backend());
        let statement = schema.create_table_from_entity(entity);

        self.connection
            .execute_unprepared(&statement.to_string(SqliteQueryBuilder))
            .await
            .expect("Failed to create table");
    }

    /// Cloned handle for services and repositories
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
