//! Catalog services.
//!
//! Each service borrows the [`AppUnitOfWork`] for the duration of a request.
//! Services run every read-only pre-check (uniqueness, reference resolution,
//! prior interaction) before the single repository write, so a rejected
//! request leaves nothing behind. The adapters still enforce the same rules
//! through constraints and report them with the same errors.

use std::fmt::Display;

use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

pub mod catalog;
pub mod crew;
pub mod games;
pub mod likes;
pub mod media;
pub mod movies;
pub mod reviews;
pub mod users;

pub use catalog::{DeveloperService, GenreService, PlatformService};
pub use crew::CrewService;
pub use games::GameService;
pub use likes::LikeService;
pub use media::MediaService;
pub use movies::MovieService;
pub use reviews::ReviewService;
pub use users::UserService;

/// Turns an absent lookup into `NotFound` for the requested id.
pub(crate) fn found<T>(value: Option<T>, aggregate: Aggregate, id: impl Display) -> Result<T> {
    value.ok_or_else(|| CatalogError::not_found(aggregate, id))
}

/// Turns a `false` delete into `NotFound` for the requested id.
pub(crate) fn deleted(removed: bool, aggregate: Aggregate, id: impl Display) -> Result<()> {
    if removed {
        Ok(())
    } else {
        Err(CatalogError::not_found(aggregate, id))
    }
}

/// Entry point handing out services over one unit of work.
#[derive(Debug, Clone, Copy)]
pub struct Services<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> Services<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub fn users(&self) -> UserService<'a> {
        UserService::new(self.uow)
    }

    pub fn developers(&self) -> DeveloperService<'a> {
        DeveloperService::new(self.uow)
    }

    pub fn platforms(&self) -> PlatformService<'a> {
        PlatformService::new(self.uow)
    }

    pub fn genres(&self) -> GenreService<'a> {
        GenreService::new(self.uow)
    }

    pub fn games(&self) -> GameService<'a> {
        GameService::new(self.uow)
    }

    pub fn movies(&self) -> MovieService<'a> {
        MovieService::new(self.uow)
    }

    pub fn crew(&self) -> CrewService<'a> {
        CrewService::new(self.uow)
    }

    pub fn media(&self) -> MediaService<'a> {
        MediaService::new(self.uow)
    }

    pub fn likes(&self) -> LikeService<'a> {
        LikeService::new(self.uow)
    }

    pub fn reviews(&self) -> ReviewService<'a> {
        ReviewService::new(self.uow)
    }
}
