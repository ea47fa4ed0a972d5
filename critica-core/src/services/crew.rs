use critica_model::{
    CrewAssignment, CrewId, MediaId, MovieCrew, MovieCrewKey, MovieCrewRole, NewMovieCrew, Page,
    PageRequest,
};

use super::{deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

fn role_label(key: MovieCrewKey) -> String {
    format!("crew {} in movie {}", key.crew_id, key.movie_id)
}

/// Crew members and their roles in movies.
#[derive(Debug, Clone, Copy)]
pub struct CrewService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> CrewService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, crew: NewMovieCrew) -> Result<MovieCrew> {
        self.uow.crew.insert(&crew).await
    }

    pub async fn get(&self, id: CrewId) -> Result<MovieCrew> {
        found(self.uow.crew.get(id).await?, Aggregate::MovieCrew, id)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<MovieCrew>> {
        self.uow.crew.list(page).await
    }

    pub async fn delete(&self, id: CrewId) -> Result<()> {
        deleted(self.uow.crew.delete(id).await?, Aggregate::MovieCrew, id)
    }

    /// One role per (movie, crew) pair.
    pub async fn assign(&self, movie_id: MediaId, assignment: CrewAssignment) -> Result<MovieCrewRole> {
        found(self.uow.movies.get(movie_id).await?, Aggregate::Movie, movie_id)?;
        found(
            self.uow.crew.get(assignment.crew_id).await?,
            Aggregate::MovieCrew,
            assignment.crew_id,
        )?;

        let key = MovieCrewKey::new(movie_id, assignment.crew_id);
        if self.uow.crew.find_role(key).await?.is_some() {
            return Err(CatalogError::already_exists(
                Aggregate::MovieCrewRole,
                role_label(key),
            ));
        }

        self.uow.crew.assign_role(&assignment.into_role(movie_id)).await
    }

    pub async fn unassign(&self, movie_id: MediaId, crew_id: CrewId) -> Result<()> {
        let key = MovieCrewKey::new(movie_id, crew_id);
        deleted(
            self.uow.crew.remove_role(key).await?,
            Aggregate::MovieCrewRole,
            role_label(key),
        )
    }
}
