use critica_model::{Media, MediaId, NewMovie, Page, PageRequest};
use tracing::debug;

use super::{deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, Result};
use crate::query::MovieFilter;

#[derive(Debug, Clone, Copy)]
pub struct MovieService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> MovieService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, movie: NewMovie) -> Result<Media> {
        self.uow.movies.insert(&movie).await
    }

    pub async fn get(&self, id: MediaId) -> Result<Media> {
        found(self.uow.movies.get(id).await?, Aggregate::Movie, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Media>> {
        self.uow.movies.search(&MovieFilter::all(), page).await
    }

    pub async fn search(&self, filter: &MovieFilter, page: PageRequest) -> Result<Page<Media>> {
        debug!(target: "critica::movies", criteria = filter.criteria().len(), "searching movies");
        self.uow.movies.search(filter, page).await
    }

    /// Crew roles, likes and reviews of the movie go with it.
    pub async fn delete(&self, id: MediaId) -> Result<()> {
        deleted(self.uow.movies.delete(id).await?, Aggregate::Movie, id)
    }
}
