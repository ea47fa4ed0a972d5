//! PostgreSQL-backed repository implementations.

mod common;
mod named;

pub mod crew;
pub mod developers;
pub mod games;
pub mod genres;
pub mod likes;
pub mod media;
pub mod movies;
pub mod platforms;
pub mod reviews;
pub mod users;
