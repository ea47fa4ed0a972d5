//! Repository ports, one per aggregate.
//!
//! Services depend on these traits only. Implementations live under
//! `database::infrastructure` (Postgres and in-memory).

pub mod crew;
pub mod developers;
pub mod genres;
pub mod games;
pub mod likes;
pub mod media;
pub mod movies;
pub mod platforms;
pub mod reviews;
pub mod users;
