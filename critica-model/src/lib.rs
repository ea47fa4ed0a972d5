//! Core data model definitions shared across Critica crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod crew;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod media;
pub mod page;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{
    Developer, GameGenre, GameRef, NewDeveloper, NewNamed, Platform, normalize_name,
};
pub use crew::{
    CrewAssignment, CrewRole, MovieCrew, MovieCrewKey, MovieCrewRole, NewCrewRole, NewMovieCrew,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{
    CrewId, DeveloperId, GenreId, LikeId, MediaId, PlatformId, ReviewId, UserId,
};
pub use interaction::{Like, NewLike, NewReview, Review, ReviewPatch};
pub use media::{
    DeveloperRef, GameDetails, Media, MediaDetails, MediaKind, MediaStats, MovieDetails, NewGame,
    NewMovie,
};
pub use page::{Page, PageRequest};
pub use user::{NewUser, User};
