use critica_model::{Media, MediaId, NewGame, Page, PageRequest};
use tracing::debug;

use super::{deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};
use crate::limits::price_violation;
use crate::query::GameFilter;

#[derive(Debug, Clone, Copy)]
pub struct GameService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> GameService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    /// Checks the price against the column limits, then resolves the
    /// developer, every genre and every platform before the insert. The
    /// first missing reference fails with its own `NotFound`.
    pub async fn create(&self, game: NewGame) -> Result<Media> {
        if let Some(violation) = price_violation(game.price) {
            return Err(CatalogError::invalid(violation));
        }
        if let Some(developer_id) = game.developer_id {
            found(
                self.uow.developers.get(developer_id).await?,
                Aggregate::Developer,
                developer_id,
            )?;
        }
        for genre_id in &game.genre_ids {
            found(self.uow.genres.get(*genre_id).await?, Aggregate::Genre, genre_id)?;
        }
        for platform_id in &game.platform_ids {
            found(
                self.uow.platforms.get(*platform_id).await?,
                Aggregate::Platform,
                platform_id,
            )?;
        }

        self.uow.games.insert(&game).await
    }

    pub async fn get(&self, id: MediaId) -> Result<Media> {
        found(self.uow.games.get(id).await?, Aggregate::Game, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Media>> {
        self.uow.games.search(&GameFilter::all(), page).await
    }

    pub async fn search(&self, filter: &GameFilter, page: PageRequest) -> Result<Page<Media>> {
        debug!(target: "critica::games", criteria = filter.criteria().len(), "searching games");
        self.uow.games.search(filter, page).await
    }

    /// Likes and reviews of the game go with it.
    pub async fn delete(&self, id: MediaId) -> Result<()> {
        deleted(self.uow.games.delete(id).await?, Aggregate::Game, id)
    }
}
