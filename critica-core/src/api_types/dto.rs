//! Public response shapes. Built only through [`crate::conversion`].

use chrono::{DateTime, NaiveDate, Utc};
use critica_model::{
    CrewId, CrewRole, DeveloperId, GameRef, GenreId, LikeId, MediaId, MediaKind, PlatformId,
    ReviewId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperDto {
    pub id: DeveloperId,
    pub name: String,
    pub social_links: Vec<String>,
    pub games: Vec<GameRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperSummaryDto {
    pub id: DeveloperId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDto {
    pub id: PlatformId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDto {
    pub id: MediaId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub price: Decimal,
    pub developer: Option<DeveloperSummaryDto>,
    pub genres: Vec<GenreDto>,
    pub platforms: Vec<PlatformDto>,
    pub like_count: i64,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: MediaId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub producer: String,
    pub actors: Vec<String>,
    pub crew: Vec<CrewRoleDto>,
    pub like_count: i64,
    pub review_count: i64,
}

/// Media resolved without knowing its kind up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaDto {
    Game(GameDto),
    Movie(MovieDto),
}

impl MediaDto {
    pub fn id(&self) -> MediaId {
        match self {
            MediaDto::Game(game) => game.id,
            MediaDto::Movie(movie) => movie.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDto::Game(_) => MediaKind::Game,
            MediaDto::Movie(_) => MediaKind::Movie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCrewDto {
    pub id: CrewId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRoleDto {
    pub movie_id: MediaId,
    pub crew_id: CrewId,
    pub crew_name: String,
    pub role: CrewRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRefDto {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRefDto {
    pub id: MediaId,
    pub title: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeDto {
    pub id: LikeId,
    pub user: UserRefDto,
    pub media: MediaRefDto,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDto {
    pub id: ReviewId,
    pub user: UserRefDto,
    pub media: MediaRefDto,
    pub score: i16,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
