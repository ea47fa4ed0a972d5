use async_trait::async_trait;
use critica_model::{Media, MediaId, NewMovie, Page, PageRequest};

use crate::error::Result;
use crate::query::MovieFilter;

/// Every returned [`Media`] carries `MediaDetails::Movie` with crew loaded.
#[async_trait]
pub trait MoviesRepository: Send + Sync {
    async fn insert(&self, movie: &NewMovie) -> Result<Media>;
    async fn get(&self, id: MediaId) -> Result<Option<Media>>;
    async fn search(&self, filter: &MovieFilter, page: PageRequest) -> Result<Page<Media>>;
    /// Removes likes, reviews and crew roles of the movie.
    async fn delete(&self, id: MediaId) -> Result<bool>;
}
