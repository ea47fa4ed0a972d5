use std::{fmt, sync::Arc};

use critica_core::{
    application::AppUnitOfWork, database::PostgresDatabase, services::Services,
};
use critica_model::PageRequest;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    /// Present only with the postgres storage backend.
    pub postgres: Option<Arc<PostgresDatabase>>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.config.storage)
            .field("postgres", &self.postgres)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        unit_of_work: Arc<AppUnitOfWork>,
        postgres: Option<Arc<PostgresDatabase>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            unit_of_work,
            postgres,
            config,
        }
    }

    /// State over a fresh in-memory catalog.
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(AppUnitOfWork::in_memory()), None, Arc::new(config))
    }

    pub fn services(&self) -> Services<'_> {
        Services::new(&self.unit_of_work)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_page(&self) -> PageRequest {
        self.config.pagination.default_request()
    }
}
