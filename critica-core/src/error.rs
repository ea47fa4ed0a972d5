use std::fmt;

use critica_model::{MediaId, ModelError, UserId};
use thiserror::Error;

use crate::messages::{ErrorCode, FieldViolation};

/// Aggregate named in not-found and uniqueness failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Developer,
    Platform,
    Genre,
    Game,
    Movie,
    Media,
    MovieCrew,
    MovieCrewRole,
    Review,
    Like,
    User,
}

impl Aggregate {
    pub const fn label(self) -> &'static str {
        match self {
            Aggregate::Developer => "Developer",
            Aggregate::Platform => "Platform",
            Aggregate::Genre => "Genre",
            Aggregate::Game => "Game",
            Aggregate::Movie => "Movie",
            Aggregate::Media => "Media",
            Aggregate::MovieCrew => "Movie crew",
            Aggregate::MovieCrewRole => "Movie crew role",
            Aggregate::Review => "Review",
            Aggregate::Like => "Like",
            Aggregate::User => "User",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("{}", ErrorCode::NotFound.render(&[("aggregate", .aggregate), ("id", .id)]))]
    NotFound { aggregate: Aggregate, id: String },

    #[error("{}", ErrorCode::AlreadyExists.render(&[("aggregate", .aggregate), ("value", .value)]))]
    AlreadyExists { aggregate: Aggregate, value: String },

    #[error("{}", ErrorCode::AlreadyLiked.render(&[("user", .user), ("media", .media)]))]
    AlreadyLiked { user: UserId, media: MediaId },

    #[error("{}", ErrorCode::AlreadyReviewed.render(&[("user", .user), ("media", .media)]))]
    AlreadyReviewed { user: UserId, media: MediaId },

    #[error("{}", join_violations(.0))]
    Invalid(Vec<FieldViolation>),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn not_found(aggregate: Aggregate, id: impl fmt::Display) -> Self {
        Self::NotFound {
            aggregate,
            id: id.to_string(),
        }
    }

    pub fn already_exists(aggregate: Aggregate, value: impl Into<String>) -> Self {
        Self::AlreadyExists {
            aggregate,
            value: value.into(),
        }
    }

    pub fn invalid(violation: FieldViolation) -> Self {
        Self::Invalid(vec![violation])
    }

    pub fn storage(context: &str, err: impl fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::NotFound { .. } => ErrorCode::NotFound,
            CatalogError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            CatalogError::AlreadyLiked { .. } => ErrorCode::AlreadyLiked,
            CatalogError::AlreadyReviewed { .. } => ErrorCode::AlreadyReviewed,
            CatalogError::Invalid(_) => ErrorCode::ValidationFailed,
            CatalogError::Storage(_) => ErrorCode::Unexpected,
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        CatalogError::Storage(format!("Corrupt row: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
