use async_trait::async_trait;
use critica_model::{Developer, DeveloperId, NewDeveloper, Page, PageRequest};

use crate::error::Result;

/// Developers are returned with their games loaded.
#[async_trait]
pub trait DevelopersRepository: Send + Sync {
    async fn insert(&self, developer: &NewDeveloper) -> Result<Developer>;
    async fn get(&self, id: DeveloperId) -> Result<Option<Developer>>;
    /// Case-insensitive.
    async fn find_by_name(&self, name: &str) -> Result<Option<Developer>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Developer>>;
    /// Games of the developer are detached, not deleted.
    async fn delete(&self, id: DeveloperId) -> Result<bool>;
}
