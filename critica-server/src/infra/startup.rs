use std::sync::Arc;

use anyhow::Context;
use critica_core::{application::AppUnitOfWork, database::PostgresDatabase};
use tracing::info;

use crate::infra::{
    app_state::AppState,
    config::{Config, StorageBackend},
};

pub async fn connect_postgres(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be provided for PostgreSQL connections")?;

    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        anyhow::bail!("Invalid database URL: must start with postgres:// or postgresql://");
    }

    PostgresDatabase::connect(url, config.database.pool_settings())
        .await
        .context("failed to connect to PostgreSQL")
}

/// Wire the storage backend named in the configuration into an [`AppState`].
/// The postgres backend has its migrations applied first.
pub async fn build_state(config: Config) -> anyhow::Result<AppState> {
    match config.storage {
        StorageBackend::Memory => {
            info!(storage = %config.storage, "catalog kept in process memory");
            Ok(AppState::in_memory(config))
        }
        StorageBackend::Postgres => {
            let postgres = connect_postgres(&config).await?;
            postgres
                .initialize_schema()
                .await
                .context("database migration failed")?;

            let unit_of_work = AppUnitOfWork::postgres(postgres.pool().clone());
            Ok(AppState::new(
                Arc::new(unit_of_work),
                Some(Arc::new(postgres)),
                Arc::new(config),
            ))
        }
    }
}
