//! Inbound payloads and their field level validation.
//!
//! Validation consumes the request and yields the domain payload the
//! services accept, so a payload that reached a service has already passed
//! every field constraint. All violations are collected; nothing stops at the
//! first failure.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use critica_model::{
    CrewAssignment, CrewId, CrewRole, DeveloperId, GenreId, MediaId, NewDeveloper, NewGame,
    NewLike, NewMovie, NewMovieCrew, NewNamed, NewReview, NewUser, PlatformId, ReviewPatch,
    UserId,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::limits::{PRICE_MAX_SCALE, price_violation};
use crate::messages::{ErrorCode, FieldViolation};

pub const TITLE_MAX: usize = 255;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 4096;
pub const REVIEW_TEXT_MAX: usize = 1024;
pub const REVIEW_SCORE_MIN: i32 = 1;
pub const REVIEW_SCORE_MAX: i32 = 10;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]{3,30}$").expect("valid username regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid url regex"));

/// Request payload that can be checked and turned into its domain form.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, Vec<FieldViolation>>;
}

#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &str, code: ErrorCode, args: &[(&str, &dyn fmt::Display)]) {
        self.0.push(FieldViolation::new(field, code, args));
    }

    fn required<'a, T>(&mut self, field: &str, value: &'a Option<T>) -> Option<&'a T> {
        if value.is_none() {
            self.push(field, ErrorCode::FieldRequired, &[("field", &field)]);
        }
        value.as_ref()
    }

    /// Required, non blank text no longer than `max` characters.
    fn text(&mut self, field: &str, value: &Option<String>, max: usize) {
        match value {
            None => self.push(field, ErrorCode::FieldRequired, &[("field", &field)]),
            Some(text) if text.trim().is_empty() => {
                self.push(field, ErrorCode::FieldBlank, &[("field", &field)])
            }
            Some(text) => self.max_len(field, text, max),
        }
    }

    fn optional_text(&mut self, field: &str, value: &Option<String>, max: usize) {
        if let Some(text) = value {
            self.max_len(field, text, max);
        }
    }

    fn max_len(&mut self, field: &str, text: &str, max: usize) {
        if text.chars().count() > max {
            self.push(
                field,
                ErrorCode::FieldTooLong,
                &[("field", &field), ("max", &max)],
            );
        }
    }

    fn score(&mut self, value: i32) {
        if !(REVIEW_SCORE_MIN..=REVIEW_SCORE_MAX).contains(&value) {
            self.push(
                "score",
                ErrorCode::ScoreOutOfRange,
                &[("min", &REVIEW_SCORE_MIN), ("max", &REVIEW_SCORE_MAX)],
            );
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Vec<FieldViolation>> {
        if !self.0.is_empty() {
            return Err(self.0);
        }
        // Every `required` field was checked above, so `build` only sees Some.
        build().ok_or_else(|| {
            vec![FieldViolation::new(
                "body",
                ErrorCode::ValidationFailed,
                &[],
            )]
        })
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Validate for CreateUserRequest {
    type Output = NewUser;

    fn validate(self) -> Result<NewUser, Vec<FieldViolation>> {
        let mut v = Violations::default();
        if let Some(username) = v.required("username", &self.username)
            && !USERNAME_RE.is_match(username.trim())
        {
            v.push("username", ErrorCode::InvalidUsername, &[]);
        }
        if let Some(email) = v.required("email", &self.email)
            && !EMAIL_RE.is_match(email.trim())
        {
            v.push("email", ErrorCode::InvalidEmail, &[]);
        }

        v.finish(|| {
            Some(NewUser {
                username: trimmed(self.username.as_deref()?),
                email: trimmed(self.email.as_deref()?),
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDeveloperRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
}

impl Validate for CreateDeveloperRequest {
    type Output = NewDeveloper;

    fn validate(self) -> Result<NewDeveloper, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.text("name", &self.name, NAME_MAX);
        for link in &self.social_links {
            if !URL_RE.is_match(link.trim()) {
                v.push(
                    "social_links",
                    ErrorCode::InvalidUrl,
                    &[("field", &"social_links"), ("value", link)],
                );
            }
        }

        v.finish(|| {
            Some(NewDeveloper {
                name: trimmed(self.name.as_deref()?),
                social_links: self.social_links.iter().map(|l| trimmed(l)).collect(),
            })
        })
    }
}

/// Payload for platforms and genres: a unique name only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNamedRequest {
    pub name: Option<String>,
}

impl Validate for CreateNamedRequest {
    type Output = NewNamed;

    fn validate(self) -> Result<NewNamed, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.text("name", &self.name, NAME_MAX);
        v.finish(|| {
            Some(NewNamed {
                name: trimmed(self.name.as_deref()?),
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub developer_id: Option<DeveloperId>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub platform_ids: Vec<PlatformId>,
}

impl Validate for CreateGameRequest {
    type Output = NewGame;

    fn validate(self) -> Result<NewGame, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.text("title", &self.title, TITLE_MAX);
        v.optional_text("description", &self.description, DESCRIPTION_MAX);
        if let Some(price) = v.required("price", &self.price)
            && let Some(violation) = price_violation(*price)
        {
            v.0.push(violation);
        }

        v.finish(|| {
            Some(NewGame {
                title: trimmed(self.title.as_deref()?),
                release_date: self.release_date,
                description: non_empty(self.description.clone()),
                price: {
                    // Stored as NUMERIC(10, 2); echo the same scale from every backend.
                    let mut price = self.price?;
                    price.rescale(PRICE_MAX_SCALE);
                    price
                },
                developer_id: self.developer_id,
                genre_ids: dedup(&self.genre_ids),
                platform_ids: dedup(&self.platform_ids),
            })
        })
    }
}

fn dedup<T: Ord + Copy>(ids: &[T]) -> Vec<T> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub producer: Option<String>,
    #[serde(default)]
    pub actors: Vec<String>,
}

impl Validate for CreateMovieRequest {
    type Output = NewMovie;

    fn validate(self) -> Result<NewMovie, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.text("title", &self.title, TITLE_MAX);
        v.optional_text("description", &self.description, DESCRIPTION_MAX);
        v.text("producer", &self.producer, NAME_MAX);
        for actor in &self.actors {
            if actor.trim().is_empty() {
                v.push("actors", ErrorCode::FieldBlank, &[("field", &"actors")]);
            } else {
                v.max_len("actors", actor, NAME_MAX);
            }
        }

        v.finish(|| {
            Some(NewMovie {
                title: trimmed(self.title.as_deref()?),
                release_date: self.release_date,
                description: non_empty(self.description.clone()),
                producer: trimmed(self.producer.as_deref()?),
                actors: self.actors.iter().map(|a| trimmed(a)).collect(),
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMovieCrewRequest {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Validate for CreateMovieCrewRequest {
    type Output = NewMovieCrew;

    fn validate(self) -> Result<NewMovieCrew, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.text("name", &self.name, NAME_MAX);
        v.finish(|| {
            Some(NewMovieCrew {
                name: trimmed(self.name.as_deref()?),
                birth_date: self.birth_date,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignCrewRoleRequest {
    pub crew_id: Option<CrewId>,
    pub role: Option<CrewRole>,
    pub character_name: Option<String>,
}

impl Validate for AssignCrewRoleRequest {
    type Output = CrewAssignment;

    fn validate(self) -> Result<CrewAssignment, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.required("crew_id", &self.crew_id);
        let character = non_empty(self.character_name.clone());
        if let Some(role) = v.required("role", &self.role)
            && role.requires_character()
            && character.is_none()
        {
            v.push("character_name", ErrorCode::CharacterRequired, &[]);
        }
        v.optional_text("character_name", &self.character_name, TITLE_MAX);

        v.finish(|| {
            let role = self.role?;
            Some(CrewAssignment {
                crew_id: self.crew_id?,
                role,
                // Only actors play a character.
                character_name: if role.requires_character() {
                    character
                } else {
                    None
                },
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLikeRequest {
    pub user_id: Option<UserId>,
    pub media_id: Option<MediaId>,
}

impl Validate for CreateLikeRequest {
    type Output = NewLike;

    fn validate(self) -> Result<NewLike, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.required("user_id", &self.user_id);
        v.required("media_id", &self.media_id);
        v.finish(|| {
            Some(NewLike {
                user_id: self.user_id?,
                media_id: self.media_id?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: Option<UserId>,
    pub media_id: Option<MediaId>,
    pub score: Option<i32>,
    pub text: Option<String>,
}

impl Validate for CreateReviewRequest {
    type Output = NewReview;

    fn validate(self) -> Result<NewReview, Vec<FieldViolation>> {
        let mut v = Violations::default();
        v.required("user_id", &self.user_id);
        v.required("media_id", &self.media_id);
        if let Some(score) = v.required("score", &self.score) {
            v.score(*score);
        }
        v.text("text", &self.text, REVIEW_TEXT_MAX);

        v.finish(|| {
            Some(NewReview {
                user_id: self.user_id?,
                media_id: self.media_id?,
                score: i16::try_from(self.score?).ok()?,
                text: trimmed(self.text.as_deref()?),
            })
        })
    }
}

/// Full replacement (PUT): both fields must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceReviewRequest {
    pub score: Option<i32>,
    pub text: Option<String>,
}

impl Validate for ReplaceReviewRequest {
    type Output = ReviewPatch;

    fn validate(self) -> Result<ReviewPatch, Vec<FieldViolation>> {
        let mut v = Violations::default();
        if let Some(score) = v.required("score", &self.score) {
            v.score(*score);
        }
        v.text("text", &self.text, REVIEW_TEXT_MAX);

        v.finish(|| {
            Some(ReviewPatch {
                score: Some(i16::try_from(self.score?).ok()?),
                text: Some(trimmed(self.text.as_deref()?)),
            })
        })
    }
}

/// Partial update (PATCH): absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchReviewRequest {
    pub score: Option<i32>,
    pub text: Option<String>,
}

impl Validate for PatchReviewRequest {
    type Output = ReviewPatch;

    fn validate(self) -> Result<ReviewPatch, Vec<FieldViolation>> {
        let mut v = Violations::default();
        if let Some(score) = self.score {
            v.score(score);
        }
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                v.push("text", ErrorCode::FieldBlank, &[("field", &"text")]);
            } else {
                v.max_len("text", text, REVIEW_TEXT_MAX);
            }
        }

        v.finish(|| {
            let score = match self.score {
                Some(raw) => Some(i16::try_from(raw).ok()?),
                None => None,
            };
            Some(ReviewPatch {
                score,
                text: self.text.as_deref().map(trimmed),
            })
        })
    }
}
