use std::fmt::{self, Display};

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidId(String),
    UnknownMediaKind(String),
    UnknownCrewRole(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId(raw) => write!(f, "invalid identifier: {raw}"),
            ModelError::UnknownMediaKind(raw) => {
                write!(f, "unknown media kind: {raw}")
            }
            ModelError::UnknownCrewRole(raw) => {
                write!(f, "unknown crew role: {raw}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
