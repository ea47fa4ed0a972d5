use critica_model::{Media, MediaId};

use super::found;
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

/// Kind-agnostic media lookup.
#[derive(Debug, Clone, Copy)]
pub struct MediaService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> MediaService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn get(&self, id: MediaId) -> Result<Media> {
        found(self.uow.media.get_media(id).await?, Aggregate::Media, id)
    }

    /// Fails with `NotFound` unless a game or movie has this id.
    pub async fn ensure_exists(&self, id: MediaId) -> Result<()> {
        if self.uow.media.exists(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(Aggregate::Media, id))
        }
    }
}
