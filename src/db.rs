use crate::config::AppConfig;
use crate::errors::AppError;
use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Postgres schema to put first on the search path
    pub schema: Option<String>,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            schema: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            schema: cfg.db_schema.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool to the database with custom configuration
///
/// # Errors
/// Returns an `AppError` if the connection cannot be established
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, AppError> {
    debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        schema = ?config.schema,
        "Configuring database connection"
    );

    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(true);

    if let Some(schema) = config.schema.as_deref().filter(|s| !s.trim().is_empty()) {
        if config.url.starts_with("postgres") {
            opt.set_schema_search_path(schema.to_string());
        }
    }

    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );

    let start = std::time::Instant::now();
    let db_pool = Database::connect(opt).await.map_err(|e| {
        error!("Database connection failed after {:?}: {}", start.elapsed(), e);
        AppError::DatabaseError(e)
    })?;

    info!(
        "Database connection pool established in {:?}",
        start.elapsed()
    );

    Ok(db_pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, AppError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Runs the embedded migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    info!("Running database migrations");
    let start = std::time::Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(AppError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!(
            "Database migrations completed successfully in {:?}",
            elapsed
        ),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Pings the database
pub async fn check_connection(pool: &DbPool) -> Result<(), AppError> {
    debug!("Checking database connection");
    let start = std::time::Instant::now();

    let result = pool.ping().await.map_err(AppError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => debug!("Database connection check successful in {:?}", elapsed),
        Err(e) => error!(
            "Database connection check failed after {:?}: {}",
            elapsed, e
        ),
    }

    result
}

/// Closes the pool, waiting for checked-out connections to be returned
pub async fn close_pool(pool: DbPool) -> Result<(), AppError> {
    info!("Closing database connection pool");

    pool.close().await.map_err(AppError::DatabaseError)
}

/// Start-up path: connect and, when `auto_migrate` is set, migrate.
pub async fn prepare_database(cfg: &AppConfig) -> anyhow::Result<DbPool> {
    let pool = establish_connection_from_app_config(cfg)
        .await
        .context("failed to connect to database")?;

    if cfg.auto_migrate {
        run_migrations(&pool)
            .await
            .context("failed running migrations")?;
    }

    Ok(pool)
}

/// Closes the pool once the last handle comes back after shutdown.
///
/// Returns `false` when another owner still holds the pool; it is then left
/// to close on drop.
pub async fn release_pool(pool: Arc<DbPool>) -> Result<bool, AppError> {
    match Arc::try_unwrap(pool) {
        Ok(pool) => {
            close_pool(pool).await?;
            Ok(true)
        }
        Err(shared) => {
            warn!(
                holders = Arc::strong_count(&shared),
                "Database pool still shared at shutdown; leaving it to drop"
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_config_takes_pool_tuning_from_app_config() {
        let mut cfg = AppConfig::new(
            "postgres://localhost/registry".into(),
            "127.0.0.1".into(),
            5000,
            "development".into(),
        );
        cfg.db_schema = Some("core".into());
        cfg.db_max_connections = 32;
        cfg.db_acquire_timeout_secs = 3;

        let db_cfg = DbConfig::from(&cfg);
        assert_eq!(db_cfg.url, "postgres://localhost/registry");
        assert_eq!(db_cfg.schema.as_deref(), Some("core"));
        assert_eq!(db_cfg.max_connections, 32);
        assert_eq!(db_cfg.acquire_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn sqlite_memory_pool_connects_and_migrates() {
        let pool = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();
        check_connection(&pool).await.unwrap();
        close_pool(pool).await.unwrap();
    }

    fn sqlite_app_config() -> AppConfig {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            "test".into(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg
    }

    #[tokio::test]
    async fn prepare_database_adds_startup_context() {
        let mut cfg = sqlite_app_config();
        cfg.database_url = "nosuchdriver://nowhere/registry".into();

        let err = prepare_database(&cfg).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to connect to database");
        assert!(err.downcast_ref::<AppError>().is_some());
    }

    #[tokio::test]
    async fn prepare_database_migrates_when_enabled() {
        let mut cfg = sqlite_app_config();
        cfg.auto_migrate = true;

        let pool = prepare_database(&cfg).await.unwrap();
        let applied = crate::migrator::Migrator::get_applied_migrations(&pool)
            .await
            .unwrap();
        assert_eq!(applied.len(), crate::migrator::Migrator::migrations().len());
    }

    #[tokio::test]
    async fn release_pool_closes_only_the_last_handle() {
        let pool = Arc::new(prepare_database(&sqlite_app_config()).await.unwrap());

        let held = pool.clone();
        assert!(!release_pool(pool).await.unwrap());
        check_connection(&held).await.unwrap();

        assert!(release_pool(held).await.unwrap());
    }
}
