use async_trait::async_trait;
use critica_model::{Media, MediaId};

use crate::error::Result;

/// Kind-agnostic access to games and movies.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Resolves the concrete kind and loads its relations and stats.
    async fn get_media(&self, id: MediaId) -> Result<Option<Media>>;
    async fn exists(&self, id: MediaId) -> Result<bool>;
}
