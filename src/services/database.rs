use std::{str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::{error, info, warn};

use crate::utilities::{config::Config, errors::AppError};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Builds the pool without opening a connection yet.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let options = connect_options(&config.database_url)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool and pings it until the server answers, up to
    /// `retries + 1` attempts.
    pub async fn connect_with_retry(config: &Config) -> Result<Self, AppError> {
        let options = connect_options(&config.database_url)?;
        let target = format!("{}:{}", options.get_host(), options.get_port());
        let database = Self::new(config)?;
        let attempts = config.database_connect_retries + 1;

        for attempt in 1..=attempts {
            match database.ping().await {
                Ok(()) => {
                    info!("Connected to PostgreSQL at {target}");
                    return Ok(database);
                }
                Err(e) if attempt < attempts => {
                    warn!("PostgreSQL at {target} not reachable (attempt {attempt}/{attempts}): {e}");
                    tokio::time::sleep(config.database_connect_retry_delay()).await;
                }
                Err(e) => {
                    error!("Giving up on PostgreSQL at {target} after {attempts} attempts");
                    return Err(AppError::DatabaseConnectionError(format!(
                        "Unable to reach PostgreSQL at {target} ({e})"
                    )));
                }
            }
        }

        Err(AppError::DatabaseConnectionError(format!(
            "Unable to reach PostgreSQL at {target}"
        )))
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn connect_options(database_url: &str) -> Result<PgConnectOptions, AppError> {
    PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseConnectionError(format!("invalid DATABASE_URL, {e}")))
}
