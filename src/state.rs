use std::{str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{auth::gate::AdminGate, config::AppConfig, session::SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub gate: Arc<AdminGate>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("parse DATABASE_URL {:?}", config.database_url))?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let gate = Arc::new(AdminGate::from_secret(&config.admin_password)?);

        Ok(Self::from_parts(db, config, gate))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, gate: Arc<AdminGate>) -> Self {
        Self {
            db,
            config,
            gate,
            sessions: SessionRegistry::default(),
        }
    }

    /// State backed by a migrated in-memory database, admin password `test-admin`.
    #[cfg(test)]
    pub async fn fake() -> Self {
        let db = memory_pool().await;
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            admin_password: "test-admin".into(),
            session: crate::config::SessionConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        });
        let gate = Arc::new(AdminGate::from_secret(&config.admin_password).expect("hash admin password"));
        Self::from_parts(db, config, gate)
    }
}

/// Single-connection in-memory pool with the schema applied. The connection
/// is never recycled, so the database lives as long as the pool.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("migrations apply");
    db
}
