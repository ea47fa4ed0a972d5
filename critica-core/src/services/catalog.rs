//! Developers, platforms and genres: aggregates identified by a unique name.

use critica_model::{
    Developer, DeveloperId, GameGenre, GenreId, NewDeveloper, NewNamed, Page, PageRequest,
    Platform, PlatformId, normalize_name,
};
use tracing::info;

use super::{deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

#[derive(Debug, Clone, Copy)]
pub struct DeveloperService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> DeveloperService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, developer: NewDeveloper) -> Result<Developer> {
        let name = normalize_name(&developer.name);
        if self.uow.developers.find_by_name(&name).await?.is_some() {
            return Err(CatalogError::already_exists(Aggregate::Developer, name));
        }
        let created = self
            .uow
            .developers
            .insert(&NewDeveloper {
                name,
                social_links: developer.social_links,
            })
            .await?;
        info!(target: "critica::developers", developer_id = %created.id, "registered developer");
        Ok(created)
    }

    pub async fn get(&self, id: DeveloperId) -> Result<Developer> {
        found(self.uow.developers.get(id).await?, Aggregate::Developer, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Developer>> {
        self.uow.developers.list(page).await
    }

    /// Games of the developer are kept and lose their developer.
    pub async fn delete(&self, id: DeveloperId) -> Result<()> {
        deleted(self.uow.developers.delete(id).await?, Aggregate::Developer, id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlatformService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> PlatformService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, platform: NewNamed) -> Result<Platform> {
        let name = normalize_name(&platform.name);
        if self.uow.platforms.find_by_name(&name).await?.is_some() {
            return Err(CatalogError::already_exists(Aggregate::Platform, name));
        }
        self.uow.platforms.insert(&NewNamed { name }).await
    }

    pub async fn get(&self, id: PlatformId) -> Result<Platform> {
        found(self.uow.platforms.get(id).await?, Aggregate::Platform, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Platform>> {
        self.uow.platforms.list(page).await
    }

    pub async fn delete(&self, id: PlatformId) -> Result<()> {
        deleted(self.uow.platforms.delete(id).await?, Aggregate::Platform, id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenreService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> GenreService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, genre: NewNamed) -> Result<GameGenre> {
        let name = normalize_name(&genre.name);
        if self.uow.genres.find_by_name(&name).await?.is_some() {
            return Err(CatalogError::already_exists(Aggregate::Genre, name));
        }
        self.uow.genres.insert(&NewNamed { name }).await
    }

    pub async fn get(&self, id: GenreId) -> Result<GameGenre> {
        found(self.uow.genres.get(id).await?, Aggregate::Genre, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<GameGenre>> {
        self.uow.genres.list(page).await
    }

    pub async fn delete(&self, id: GenreId) -> Result<()> {
        deleted(self.uow.genres.delete(id).await?, Aggregate::Genre, id)
    }
}
