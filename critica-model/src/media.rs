use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{GameGenre, Platform};
use crate::crew::MovieCrewRole;
use crate::error::ModelError;
use crate::ids::{DeveloperId, GenreId, MediaId, PlatformId};

/// Discriminant stored alongside every media row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Game,
    Movie,
}

impl MediaKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MediaKind::Game => "GAME",
            MediaKind::Movie => "MOVIE",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "GAME" => Ok(MediaKind::Game),
            "MOVIE" => Ok(MediaKind::Movie),
            _ => Err(ModelError::UnknownMediaKind(raw.to_string())),
        }
    }
}

/// Aggregates computed when the media row is read. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaStats {
    pub likes: i64,
    pub reviews: i64,
}

/// A game or a movie.
///
/// Shared fields live on the struct, kind specific fields on [`MediaDetails`].
/// Likes and reviews belong to the media and are removed with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub id: MediaId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub stats: MediaStats,
    pub details: MediaDetails,
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        self.details.kind()
    }

    pub fn as_game(&self) -> Option<&GameDetails> {
        match &self.details {
            MediaDetails::Game(game) => Some(game),
            MediaDetails::Movie(_) => None,
        }
    }

    pub fn as_movie(&self) -> Option<&MovieDetails> {
        match &self.details {
            MediaDetails::Movie(movie) => Some(movie),
            MediaDetails::Game(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetails {
    Game(GameDetails),
    Movie(MovieDetails),
}

impl MediaDetails {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDetails::Game(_) => MediaKind::Game,
            MediaDetails::Movie(_) => MediaKind::Movie,
        }
    }
}

/// Developer reference as seen from a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperRef {
    pub id: DeveloperId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameDetails {
    pub price: Decimal,
    pub developer: Option<DeveloperRef>,
    /// `None` when the association was not loaded.
    pub genres: Option<Vec<GameGenre>>,
    /// `None` when the association was not loaded.
    pub platforms: Option<Vec<Platform>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub producer: String,
    pub actors: BTreeSet<String>,
    /// `None` when the association was not loaded.
    pub crew: Option<Vec<MovieCrewRole>>,
}

/// Insert payload for a game. References are resolved by the service first.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub price: Decimal,
    pub developer_id: Option<DeveloperId>,
    pub genre_ids: Vec<GenreId>,
    pub platform_ids: Vec<PlatformId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub producer: String,
    pub actors: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_round_trips_through_text() {
        for kind in [MediaKind::Game, MediaKind::Movie] {
            assert_eq!(kind.as_str().parse::<MediaKind>().unwrap(), kind);
        }
        assert!("series".parse::<MediaKind>().is_err());
    }
}
