//! Named catalog aggregates: developers, platforms and genres.

use serde::{Deserialize, Serialize};

use crate::ids::{DeveloperId, GenreId, MediaId, PlatformId};

/// Minimal view of a game used on the "one" side of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRef {
    pub id: MediaId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    pub id: DeveloperId,
    /// Stored lowercase; unique regardless of case.
    pub name: String,
    pub social_links: Vec<String>,
    /// `None` when the games were not loaded for this read.
    pub games: Option<Vec<GameRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameGenre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeveloper {
    pub name: String,
    pub social_links: Vec<String>,
}

/// Insert payload for aggregates that only carry a unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNamed {
    pub name: String,
}

/// Canonical form used for storage and uniqueness checks.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
