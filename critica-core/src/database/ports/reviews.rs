use async_trait::async_trait;
use critica_model::{MediaId, NewReview, Page, PageRequest, Review, ReviewId, ReviewPatch, UserId};

use crate::error::Result;
use crate::query::ReviewFilter;

#[async_trait]
pub trait ReviewsRepository: Send + Sync {
    /// A second review for the same (user, media) is reported as
    /// `AlreadyReviewed`.
    async fn insert(&self, review: &NewReview) -> Result<Review>;
    async fn get(&self, id: ReviewId) -> Result<Option<Review>>;
    async fn search(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>>;
    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool>;
    /// Applies the present fields and bumps `updated_at`. `None` when absent.
    async fn update(&self, id: ReviewId, patch: &ReviewPatch) -> Result<Option<Review>>;
    async fn delete(&self, id: ReviewId) -> Result<bool>;
}
