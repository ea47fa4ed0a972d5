use async_trait::async_trait;
use critica_model::{NewNamed, Page, PageRequest, Platform, PlatformId};
use sqlx::PgPool;

use super::named::{NamedRow, NamedTable};
use crate::database::ports::platforms::PlatformsRepository;
use crate::error::{Aggregate, Result};

const PLATFORMS: NamedTable = NamedTable {
    aggregate: Aggregate::Platform,
    insert: "INSERT INTO platforms (name) VALUES ($1) RETURNING id, name",
    by_id: "SELECT id, name FROM platforms WHERE id = $1",
    by_name: "SELECT id, name FROM platforms WHERE LOWER(name) = $1",
    list: "SELECT id, name FROM platforms ORDER BY id LIMIT $1 OFFSET $2",
    count: "SELECT COUNT(*) FROM platforms",
    delete: "DELETE FROM platforms WHERE id = $1",
    unique_index: "platforms_name_ci_key",
};

/// PostgreSQL-backed implementation of the `PlatformsRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresPlatformsRepository {
    pool: PgPool,
}

impl PostgresPlatformsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn platform(row: NamedRow) -> Platform {
    Platform {
        id: PlatformId(row.id),
        name: row.name,
    }
}

#[async_trait]
impl PlatformsRepository for PostgresPlatformsRepository {
    async fn insert(&self, platform_in: &NewNamed) -> Result<Platform> {
        PLATFORMS
            .insert(self.pool(), &platform_in.name)
            .await
            .map(platform)
    }

    async fn get(&self, id: PlatformId) -> Result<Option<Platform>> {
        Ok(PLATFORMS.get(self.pool(), id.get()).await?.map(platform))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Platform>> {
        Ok(PLATFORMS.find_by_name(self.pool(), name).await?.map(platform))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Platform>> {
        Ok(PLATFORMS.list(self.pool(), page).await?.map(platform))
    }

    async fn delete(&self, id: PlatformId) -> Result<bool> {
        PLATFORMS.delete(self.pool(), id.get()).await
    }
}
