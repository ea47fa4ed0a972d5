use async_trait::async_trait;
use critica_model::{Like, LikeId, MediaId, NewLike, Page, PageRequest, UserId};

use crate::error::Result;

#[async_trait]
pub trait LikesRepository: Send + Sync {
    /// A second like for the same (user, media) is reported as `AlreadyLiked`.
    async fn insert(&self, like: &NewLike) -> Result<Like>;
    async fn get(&self, id: LikeId) -> Result<Option<Like>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Like>>;
    async fn list_by_media(&self, media: MediaId, page: PageRequest) -> Result<Page<Like>>;
    async fn list_by_user(&self, user: UserId, page: PageRequest) -> Result<Page<Like>>;
    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool>;
    async fn delete(&self, id: LikeId) -> Result<bool>;
}
