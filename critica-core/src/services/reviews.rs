use critica_model::{NewReview, Page, PageRequest, Review, ReviewId, ReviewPatch};
use tracing::debug;

use super::{MediaService, UserService, deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};
use crate::query::ReviewFilter;

#[derive(Debug, Clone, Copy)]
pub struct ReviewService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> ReviewService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    /// User and media are checked independently, then the pair itself.
    pub async fn create(&self, review: NewReview) -> Result<Review> {
        UserService::new(self.uow).get(review.user_id).await?;
        MediaService::new(self.uow).ensure_exists(review.media_id).await?;
        if self.uow.reviews.exists_by(review.user_id, review.media_id).await? {
            return Err(CatalogError::AlreadyReviewed {
                user: review.user_id,
                media: review.media_id,
            });
        }
        self.uow.reviews.insert(&review).await
    }

    pub async fn get(&self, id: ReviewId) -> Result<Review> {
        found(self.uow.reviews.get(id).await?, Aggregate::Review, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Review>> {
        self.uow.reviews.search(&ReviewFilter::all(), page).await
    }

    pub async fn search(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>> {
        debug!(target: "critica::reviews", criteria = filter.criteria().len(), "searching reviews");
        self.uow.reviews.search(filter, page).await
    }

    /// Writes the fields present in `patch`. A full replacement is a patch
    /// with both fields set; an empty patch only refreshes `updated_at`.
    pub async fn update(&self, id: ReviewId, patch: ReviewPatch) -> Result<Review> {
        found(self.uow.reviews.update(id, &patch).await?, Aggregate::Review, id)
    }

    pub async fn delete(&self, id: ReviewId) -> Result<()> {
        deleted(self.uow.reviews.delete(id).await?, Aggregate::Review, id)
    }
}
