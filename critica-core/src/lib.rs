//! # Critica Core
//!
//! Domain rules, persistence ports and adapters for the Critica catalog: games,
//! movies, their developers, platforms, genres and crew, and the users who like
//! and review them.
//!
//! ## Architecture
//!
//! - [`api_types`]: request payloads with their validation, response DTOs and
//!   the response envelope
//! - [`conversion`]: entity to DTO mapping
//! - [`query`]: search keys and the criteria they parse into
//! - [`services`]: uniqueness, reference and ownership checks in front of the
//!   repositories
//! - [`database`]: repository ports with Postgres and in-memory adapters
//! - [`error`] and [`messages`]: the error taxonomy and its message table
//!
//! ## Examples
//!
//! ```no_run
//! use critica_core::application::AppUnitOfWork;
//! use critica_core::services::Services;
//! use critica_model::NewNamed;
//!
//! async fn seed() -> critica_core::error::Result<()> {
//!     let uow = AppUnitOfWork::in_memory();
//!     let genre = Services::new(&uow)
//!         .genres()
//!         .create(NewNamed { name: "Platformer".into() })
//!         .await?;
//!     assert_eq!(genre.name, "platformer");
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Route constants shared by the server and its clients
pub mod api;

/// Request and response types used across the HTTP boundary
pub mod api_types;

/// Composition of repository ports
pub mod application;

/// Entity to DTO conversion
pub mod conversion;

/// Repository ports, adapters and the connection pool
pub mod database;

/// Error types and error handling utilities
pub mod error;

/// Column limits shared by validation and the services
pub mod limits;

/// User facing message table
pub mod messages;

/// Search criteria for the `search` endpoints
pub mod query;

/// Catalog services
pub mod services;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{Aggregate, CatalogError, Result};
