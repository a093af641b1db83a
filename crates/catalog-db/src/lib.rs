//! SQLite persistence layer for the vehicle catalog.
//!
//! This crate owns the seven catalog tables and the repositories that map
//! their rows to [`catalog_core`] entities. Cascade and set-null effects of a
//! delete are left to the store's foreign keys.
//!
//! # Example
//!
//! ```no_run
//! use catalog_core::{Account, Advertiser, Vehicle};
//! use catalog_db::{user, vehicle, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and create the schema
//!     let db = Database::connect("sqlite:catalogo_veiculos.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Register an advertiser and give them a vehicle
//!     let seller = Advertiser::new(
//!         Account::new(0, "12345678900", "João", "joao@email.com", "senha123"),
//!         "119999",
//!     );
//!     let seller_id = user::save(db.pool(), &seller.into()).await?;
//!     let corolla = Vehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000);
//!     vehicle::save(db.pool(), &corolla, Some(seller_id)).await?;
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod advertisement;
pub mod error;
pub mod models;
pub mod search_history;
pub mod seed;
pub mod statement;
pub mod stats;
pub mod user;
pub mod vehicle;

pub use error::{DatabaseError, Result};
pub use models::{AdvertisementRow, SearchEntry, UserRow, VehicleRow};
pub use statement::{Executed, SqlValue};
pub use stats::CatalogStats;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Tables in drop order: dependents before the tables they reference.
pub const TABLES: [&str; 7] = [
    "anuncios",
    "historico_pesquisas",
    "veiculos",
    "clientes",
    "anunciantes",
    "admins",
    "usuarios",
];

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    url: String,
    pool_size: u32,
    pool: SqlitePool,
}

impl Database {
    /// Default pool size. One connection keeps every statement on a single
    /// writer and keeps `sqlite::memory:` databases alive.
    pub const DEFAULT_POOL_SIZE: u32 = 1;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for an isolated in-memory database.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let pool = Self::open_pool(url, pool_size).await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self {
            url: url.to_string(),
            pool_size,
            pool,
        })
    }

    async fn open_pool(url: &str, pool_size: u32) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        Ok(pool)
    }

    /// Create the schema.
    ///
    /// Safe to call on a database that already has the tables.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Drop every catalog table along with the migration bookkeeping, so the
    /// next [`migrate`](Self::migrate) starts from scratch.
    pub async fn reset(&self) -> Result<()> {
        for table in TABLES {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&self.pool)
                .await?;
        }
        sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
            .execute(&self.pool)
            .await?;

        tracing::info!("Database reset: {}", self.url);
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// URL this handle is bound to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database closed: {}", self.url);
    }

    /// Close the current pool and bind a fresh one to the same URL.
    pub async fn reopen(&mut self) -> Result<()> {
        if !self.pool.is_closed() {
            self.pool.close().await;
        }
        self.pool = Self::open_pool(&self.url, self.pool_size).await?;
        tracing::info!("Database reopened: {}", self.url);
        Ok(())
    }

    /// Execute one parameterized statement.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<Executed> {
        statement::execute(&self.pool, sql, params).await
    }

    /// Execute one statement for each parameter row.
    pub async fn execute_many(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        statement::execute_many(&self.pool, sql, rows).await
    }

    /// Fetch at most one row.
    pub async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Result<Option<SqliteRow>> {
        statement::fetch_one(&self.pool, sql, params).await
    }

    /// Fetch every row.
    pub async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqliteRow>> {
        statement::fetch_all(&self.pool, sql, params).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    async fn table_count(db: &Database) -> i64 {
        let row = db
            .fetch_one(
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('usuarios','admins','anunciantes','clientes','historico_pesquisas','veiculos','anuncios')",
                &[],
            )
            .await
            .unwrap()
            .unwrap();
        row.get("n")
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = test_support::test_db().await;
        db.migrate().await.unwrap();
        assert_eq!(table_count(&db).await, 7);
    }

    #[tokio::test]
    async fn test_reset_drops_all_tables_and_migrate_recreates() {
        let db = test_support::test_db().await;
        db.execute(
            "INSERT INTO usuarios (cpf, nome, email, senha, tipo) VALUES (?, ?, ?, ?, ?)",
            &["00000000000".into(), "Admin".into(), "a@a.com".into(), "admin123".into(), "admin".into()],
        )
        .await
        .unwrap();

        db.reset().await.unwrap();
        assert_eq!(table_count(&db).await, 0);

        db.migrate().await.unwrap();
        assert_eq!(table_count(&db).await, 7);
        let rows = db.fetch_all("SELECT id FROM usuarios", &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_execute_reports_last_insert_id() {
        let db = test_support::test_db().await;
        let sql = "INSERT INTO veiculos (marca, modelo, ano, preco, quilometragem, anunciante_id) \
                   VALUES (?, ?, ?, ?, ?, ?)";
        let first = db
            .execute(sql, &["Ford".into(), "Ka".into(), 2018.into(), 35000.0.into(), 45000.into(), SqlValue::Null])
            .await
            .unwrap();
        let second = db
            .execute(sql, &["Fiat".into(), "Palio".into(), 2015.into(), 28000.0.into(), 70000.into(), SqlValue::Null])
            .await
            .unwrap();
        assert_eq!(first.rows_affected, 1);
        assert!(second.last_insert_id > first.last_insert_id);

        let written = db
            .execute_many(
                "UPDATE veiculos SET preco = ? WHERE id = ?",
                &[
                    vec![30000.0.into(), first.last_insert_id.into()],
                    vec![25000.0.into(), second.last_insert_id.into()],
                ],
            )
            .await
            .unwrap();
        assert_eq!(written, 2);

        let row = db
            .fetch_one("SELECT preco FROM veiculos WHERE id = ?", &[second.last_insert_id.into()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.get::<f64, _>("preco"), 25000.0);
    }

    #[tokio::test]
    async fn test_close_and_reopen() {
        let mut db = test_support::test_db().await;
        db.close().await;
        assert!(db.is_closed());
        assert!(db.fetch_all("SELECT 1", &[]).await.is_err());

        db.reopen().await.unwrap();
        assert!(!db.is_closed());
        // In-memory databases come back empty.
        db.migrate().await.unwrap();
        assert_eq!(table_count(&db).await, 7);
    }
}
