use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    pub async fn init(config: &AppConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let con_opts = config.db_config.connection_options();

        let db_pool = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_millis(500))
            .connect_with(con_opts)
            .await
            .map_err(|_| Error::FailToCreatePool)?;

        Ok(Self { db: db_pool })
    }

    /// Creates a uniquely named database and migrates it, so every test run
    /// gets an isolated store.
    pub async fn test_init(config: &AppConfig) -> Result<Self> {
        let mut db_config = config.db_config.clone();
        db_config.db_name = format!("test_{}", Uuid::new_v4().simple());

        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        let db_pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(1000))
            .connect_with(db_config.connection_options())
            .await
            .map_err(|_| Error::FailToCreatePool)?;
        sqlx::migrate!("./migrations").run(&db_pool).await?;

        Ok(Self { db: db_pool })
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool")]
    FailToCreatePool,
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
