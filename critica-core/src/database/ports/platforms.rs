use async_trait::async_trait;
use critica_model::{NewNamed, Page, PageRequest, Platform, PlatformId};

use crate::error::Result;

#[async_trait]
pub trait PlatformsRepository: Send + Sync {
    async fn insert(&self, platform: &NewNamed) -> Result<Platform>;
    async fn get(&self, id: PlatformId) -> Result<Option<Platform>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Platform>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Platform>>;
    /// Removes game links only.
    async fn delete(&self, id: PlatformId) -> Result<bool>;
}
