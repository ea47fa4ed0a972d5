use critica_model::{Like, LikeId, MediaId, NewLike, Page, PageRequest, UserId};

use super::{MediaService, UserService, deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

#[derive(Debug, Clone, Copy)]
pub struct LikeService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> LikeService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    /// User and media are checked independently, then the pair itself.
    pub async fn create(&self, like: NewLike) -> Result<Like> {
        UserService::new(self.uow).get(like.user_id).await?;
        MediaService::new(self.uow).ensure_exists(like.media_id).await?;
        if self.uow.likes.exists_by(like.user_id, like.media_id).await? {
            return Err(CatalogError::AlreadyLiked {
                user: like.user_id,
                media: like.media_id,
            });
        }
        self.uow.likes.insert(&like).await
    }

    pub async fn get(&self, id: LikeId) -> Result<Like> {
        found(self.uow.likes.get(id).await?, Aggregate::Like, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Like>> {
        self.uow.likes.list(page).await
    }

    /// Likes go with their media, so an unknown or deleted id lists empty.
    pub async fn list_by_media(&self, media: MediaId, page: PageRequest) -> Result<Page<Like>> {
        self.uow.likes.list_by_media(media, page).await
    }

    pub async fn list_by_user(&self, user: UserId, page: PageRequest) -> Result<Page<Like>> {
        UserService::new(self.uow).get(user).await?;
        self.uow.likes.list_by_user(user, page).await
    }

    pub async fn delete(&self, id: LikeId) -> Result<()> {
        deleted(self.uow.likes.delete(id).await?, Aggregate::Like, id)
    }
}
