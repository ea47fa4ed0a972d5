use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use crate::database::infrastructure::memory::InMemoryCatalog;
use crate::database::infrastructure::postgres::{
    PostgresCrewRepository, PostgresDevelopersRepository, PostgresGamesRepository,
    PostgresGenresRepository, PostgresLikesRepository, PostgresMediaRepository,
    PostgresMoviesRepository, PostgresPlatformsRepository, PostgresReviewsRepository,
    PostgresUsersRepository,
};
use crate::database::ports::{
    crew::CrewRepository, developers::DevelopersRepository, games::GamesRepository,
    genres::GenresRepository, likes::LikesRepository, media::MediaRepository,
    movies::MoviesRepository, platforms::PlatformsRepository, reviews::ReviewsRepository,
    users::UsersRepository,
};

/// Aggregates all repository ports used by the catalog services.
///
/// Services borrow the unit of work and never see a concrete adapter, so the
/// same service code runs over Postgres and over the in-memory catalog.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub users: Arc<dyn UsersRepository>,
    pub developers: Arc<dyn DevelopersRepository>,
    pub platforms: Arc<dyn PlatformsRepository>,
    pub genres: Arc<dyn GenresRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub games: Arc<dyn GamesRepository>,
    pub movies: Arc<dyn MoviesRepository>,
    pub crew: Arc<dyn CrewRepository>,
    pub likes: Arc<dyn LikesRepository>,
    pub reviews: Arc<dyn ReviewsRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("developers", &type_name_of_val(self.developers.as_ref()))
            .field("platforms", &type_name_of_val(self.platforms.as_ref()))
            .field("genres", &type_name_of_val(self.genres.as_ref()))
            .field("media", &type_name_of_val(self.media.as_ref()))
            .field("games", &type_name_of_val(self.games.as_ref()))
            .field("movies", &type_name_of_val(self.movies.as_ref()))
            .field("crew", &type_name_of_val(self.crew.as_ref()))
            .field("likes", &type_name_of_val(self.likes.as_ref()))
            .field("reviews", &type_name_of_val(self.reviews.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    /// Compose all Postgres-backed repositories over one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUsersRepository::new(pool.clone())),
            developers: Arc::new(PostgresDevelopersRepository::new(pool.clone())),
            platforms: Arc::new(PostgresPlatformsRepository::new(pool.clone())),
            genres: Arc::new(PostgresGenresRepository::new(pool.clone())),
            media: Arc::new(PostgresMediaRepository::new(pool.clone())),
            games: Arc::new(PostgresGamesRepository::new(pool.clone())),
            movies: Arc::new(PostgresMoviesRepository::new(pool.clone())),
            crew: Arc::new(PostgresCrewRepository::new(pool.clone())),
            likes: Arc::new(PostgresLikesRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewsRepository::new(pool)),
        }
    }

    /// Every port backed by one shared [`InMemoryCatalog`].
    pub fn in_memory() -> Self {
        Self::from_catalog(InMemoryCatalog::new())
    }

    pub fn from_catalog(catalog: InMemoryCatalog) -> Self {
        let shared = Arc::new(catalog);
        Self {
            users: shared.clone(),
            developers: shared.clone(),
            platforms: shared.clone(),
            genres: shared.clone(),
            media: shared.clone(),
            games: shared.clone(),
            movies: shared.clone(),
            crew: shared.clone(),
            likes: shared.clone(),
            reviews: shared,
        }
    }
}

/// Assembles a unit of work port by port, for tests that swap one adapter.
#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    users: Option<Arc<dyn UsersRepository>>,
    developers: Option<Arc<dyn DevelopersRepository>>,
    platforms: Option<Arc<dyn PlatformsRepository>>,
    genres: Option<Arc<dyn GenresRepository>>,
    media: Option<Arc<dyn MediaRepository>>,
    games: Option<Arc<dyn GamesRepository>>,
    movies: Option<Arc<dyn MoviesRepository>>,
    crew: Option<Arc<dyn CrewRepository>>,
    likes: Option<Arc<dyn LikesRepository>>,
    reviews: Option<Arc<dyn ReviewsRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("users", &self.users.is_some())
            .field("developers", &self.developers.is_some())
            .field("platforms", &self.platforms.is_some())
            .field("genres", &self.genres.is_some())
            .field("media", &self.media.is_some())
            .field("games", &self.games.is_some())
            .field("movies", &self.movies.is_some())
            .field("crew", &self.crew.is_some())
            .field("likes", &self.likes.is_some())
            .field("reviews", &self.reviews.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing unit of work so single ports can be replaced.
    pub fn from_unit_of_work(uow: AppUnitOfWork) -> Self {
        Self {
            users: Some(uow.users),
            developers: Some(uow.developers),
            platforms: Some(uow.platforms),
            genres: Some(uow.genres),
            media: Some(uow.media),
            games: Some(uow.games),
            movies: Some(uow.movies),
            crew: Some(uow.crew),
            likes: Some(uow.likes),
            reviews: Some(uow.reviews),
        }
    }

    pub fn with_users(mut self, repo: Arc<dyn UsersRepository>) -> Self {
        self.users = Some(repo);
        self
    }
    pub fn with_developers(mut self, repo: Arc<dyn DevelopersRepository>) -> Self {
        self.developers = Some(repo);
        self
    }
    pub fn with_platforms(mut self, repo: Arc<dyn PlatformsRepository>) -> Self {
        self.platforms = Some(repo);
        self
    }
    pub fn with_genres(mut self, repo: Arc<dyn GenresRepository>) -> Self {
        self.genres = Some(repo);
        self
    }
    pub fn with_media(mut self, repo: Arc<dyn MediaRepository>) -> Self {
        self.media = Some(repo);
        self
    }
    pub fn with_games(mut self, repo: Arc<dyn GamesRepository>) -> Self {
        self.games = Some(repo);
        self
    }
    pub fn with_movies(mut self, repo: Arc<dyn MoviesRepository>) -> Self {
        self.movies = Some(repo);
        self
    }
    pub fn with_crew(mut self, repo: Arc<dyn CrewRepository>) -> Self {
        self.crew = Some(repo);
        self
    }
    pub fn with_likes(mut self, repo: Arc<dyn LikesRepository>) -> Self {
        self.likes = Some(repo);
        self
    }
    pub fn with_reviews(mut self, repo: Arc<dyn ReviewsRepository>) -> Self {
        self.reviews = Some(repo);
        self
    }

    /// Returns the name of the first missing port.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            users: self.users.ok_or_else(|| "missing UsersRepository".to_string())?,
            developers: self
                .developers
                .ok_or_else(|| "missing DevelopersRepository".to_string())?,
            platforms: self
                .platforms
                .ok_or_else(|| "missing PlatformsRepository".to_string())?,
            genres: self.genres.ok_or_else(|| "missing GenresRepository".to_string())?,
            media: self.media.ok_or_else(|| "missing MediaRepository".to_string())?,
            games: self.games.ok_or_else(|| "missing GamesRepository".to_string())?,
            movies: self.movies.ok_or_else(|| "missing MoviesRepository".to_string())?,
            crew: self.crew.ok_or_else(|| "missing CrewRepository".to_string())?,
            likes: self.likes.ok_or_else(|| "missing LikesRepository".to_string())?,
            reviews: self
                .reviews
                .ok_or_else(|| "missing ReviewsRepository".to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_reports_the_first_missing_port() {
        let err = AppUnitOfWorkBuilder::new().build().unwrap_err();
        assert_eq!(err, "missing UsersRepository");
    }

    #[test]
    fn builder_keeps_ports_of_an_existing_unit_of_work() {
        let uow = AppUnitOfWorkBuilder::from_unit_of_work(AppUnitOfWork::in_memory())
            .build()
            .expect("complete unit of work");
        let debug = format!("{uow:?}");
        assert!(debug.contains("UsersRepository"));
    }
}
