use async_trait::async_trait;
use critica_model::{Media, MediaId, NewGame, Page, PageRequest};

use crate::error::Result;
use crate::query::GameFilter;

/// Every returned [`Media`] carries `MediaDetails::Game` with developer,
/// genres and platforms loaded.
#[async_trait]
pub trait GamesRepository: Send + Sync {
    /// Inserts media row, game row and link rows in one transaction.
    async fn insert(&self, game: &NewGame) -> Result<Media>;
    async fn get(&self, id: MediaId) -> Result<Option<Media>>;
    async fn search(&self, filter: &GameFilter, page: PageRequest) -> Result<Page<Media>>;
    /// Likes and reviews go with the game; genres, platforms and the
    /// developer stay.
    async fn delete(&self, id: MediaId) -> Result<bool>;
}
