use async_trait::async_trait;
use critica_model::{
    CrewId, MovieCrew, MovieCrewKey, MovieCrewRole, NewCrewRole, NewMovieCrew, Page, PageRequest,
};

use crate::error::Result;

#[async_trait]
pub trait CrewRepository: Send + Sync {
    async fn insert(&self, crew: &NewMovieCrew) -> Result<MovieCrew>;
    async fn get(&self, id: CrewId) -> Result<Option<MovieCrew>>;
    async fn list(&self, page: PageRequest) -> Result<Page<MovieCrew>>;
    /// Removes every role the person holds.
    async fn delete(&self, id: CrewId) -> Result<bool>;

    /// A second role for the same key is reported as `AlreadyExists`.
    async fn assign_role(&self, role: &NewCrewRole) -> Result<MovieCrewRole>;
    async fn find_role(&self, key: MovieCrewKey) -> Result<Option<MovieCrewRole>>;
    async fn remove_role(&self, key: MovieCrewKey) -> Result<bool>;
}
