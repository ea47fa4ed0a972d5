use async_trait::async_trait;
use critica_model::{GameGenre, GenreId, NewNamed, Page, PageRequest};

use crate::error::Result;

#[async_trait]
pub trait GenresRepository: Send + Sync {
    async fn insert(&self, genre: &NewNamed) -> Result<GameGenre>;
    async fn get(&self, id: GenreId) -> Result<Option<GameGenre>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<GameGenre>>;
    async fn list(&self, page: PageRequest) -> Result<Page<GameGenre>>;
    /// Removes game links only.
    async fn delete(&self, id: GenreId) -> Result<bool>;
}
