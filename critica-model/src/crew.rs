use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::{CrewId, MediaId};

/// A person who can take part in movies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCrew {
    pub id: CrewId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovieCrew {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewRole {
    Actor,
    Director,
    Producer,
    Writer,
}

impl CrewRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            CrewRole::Actor => "ACTOR",
            CrewRole::Director => "DIRECTOR",
            CrewRole::Producer => "PRODUCER",
            CrewRole::Writer => "WRITER",
        }
    }

    /// Actors must name the character they play.
    pub const fn requires_character(self) -> bool {
        matches!(self, CrewRole::Actor)
    }
}

impl Display for CrewRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrewRole {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "ACTOR" => Ok(CrewRole::Actor),
            "DIRECTOR" => Ok(CrewRole::Director),
            "PRODUCER" => Ok(CrewRole::Producer),
            "WRITER" => Ok(CrewRole::Writer),
            _ => Err(ModelError::UnknownCrewRole(raw.to_string())),
        }
    }
}

/// Storage key of a crew membership: one role per (movie, person).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovieCrewKey {
    pub movie_id: MediaId,
    pub crew_id: CrewId,
}

impl MovieCrewKey {
    pub const fn new(movie_id: MediaId, crew_id: CrewId) -> Self {
        Self { movie_id, crew_id }
    }
}

/// Join row between a movie and a crew member.
///
/// Removed together with either parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCrewRole {
    pub key: MovieCrewKey,
    pub crew_name: String,
    pub role: CrewRole,
    pub character_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCrewRole {
    pub key: MovieCrewKey,
    pub role: CrewRole,
    pub character_name: Option<String>,
}

/// Crew membership to add to a movie known from context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewAssignment {
    pub crew_id: CrewId,
    pub role: CrewRole,
    pub character_name: Option<String>,
}

impl CrewAssignment {
    pub fn into_role(self, movie_id: MediaId) -> NewCrewRole {
        NewCrewRole {
            key: MovieCrewKey::new(movie_id, self.crew_id),
            role: self.role,
            character_name: self.character_name,
        }
    }
}
