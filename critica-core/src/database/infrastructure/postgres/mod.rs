//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::crew::PostgresCrewRepository;
pub use repositories::developers::PostgresDevelopersRepository;
pub use repositories::games::PostgresGamesRepository;
pub use repositories::genres::PostgresGenresRepository;
pub use repositories::likes::PostgresLikesRepository;
pub use repositories::media::PostgresMediaRepository;
pub use repositories::movies::PostgresMoviesRepository;
pub use repositories::platforms::PostgresPlatformsRepository;
pub use repositories::reviews::PostgresReviewsRepository;
pub use repositories::users::PostgresUsersRepository;
