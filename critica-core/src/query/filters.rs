//! Search criteria for the `*/search` endpoints.
//!
//! Each aggregate has a closed set of keys. A key parses its raw value into a
//! typed criterion; criteria are combined with AND in the order they were
//! supplied. The same criterion renders to SQL for the Postgres adapter and
//! evaluates in memory for the memory adapter.

use std::fmt;
use std::marker::PhantomData;

use critica_model::{CrewId, Media, MediaDetails, MediaId, Review, UserId};
use sqlx::{Postgres, QueryBuilder};

use crate::messages::{ErrorCode, FieldViolation};

/// Query keys that control paging and are never search criteria.
pub const PAGING_KEYS: [&str; 2] = ["page", "size"];

/// Closed set of search keys for one aggregate.
pub trait SearchKey: Copy + fmt::Debug + Sized {
    type Criterion: fmt::Debug + Clone + PartialEq;

    fn from_key(raw: &str) -> Option<Self>;

    fn criterion(self, value: &str) -> Result<Self::Criterion, FieldViolation>;
}

/// Case-insensitive substring needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains(String);

impl Contains {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

fn parse_id<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, FieldViolation> {
    value.parse::<T>().map_err(|_| {
        FieldViolation::new(
            field,
            ErrorCode::InvalidIdentifier,
            &[("field", &field), ("value", &value)],
        )
    })
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Title,
    Developer,
    Platform,
    Genre,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCriterion {
    TitleContains(Contains),
    DeveloperContains(Contains),
    PlatformContains(Contains),
    GenreContains(Contains),
}

impl SearchKey for GameKey {
    type Criterion = GameCriterion;

    fn from_key(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(GameKey::Title),
            "developer" => Some(GameKey::Developer),
            "platform" => Some(GameKey::Platform),
            "genre" => Some(GameKey::Genre),
            _ => None,
        }
    }

    fn criterion(self, value: &str) -> Result<GameCriterion, FieldViolation> {
        let needle = Contains::new(value);
        Ok(match self {
            GameKey::Title => GameCriterion::TitleContains(needle),
            GameKey::Developer => GameCriterion::DeveloperContains(needle),
            GameKey::Platform => GameCriterion::PlatformContains(needle),
            GameKey::Genre => GameCriterion::GenreContains(needle),
        })
    }
}

impl GameCriterion {
    /// Evaluates against a game with its relations loaded. Unloaded or empty
    /// relations never match.
    pub fn matches(&self, media: &Media) -> bool {
        let Some(game) = media.as_game() else {
            return false;
        };
        match self {
            GameCriterion::TitleContains(needle) => needle.matches(&media.title),
            GameCriterion::DeveloperContains(needle) => game
                .developer
                .as_ref()
                .is_some_and(|dev| needle.matches(&dev.name)),
            GameCriterion::PlatformContains(needle) => game
                .platforms
                .iter()
                .flatten()
                .any(|platform| needle.matches(&platform.name)),
            GameCriterion::GenreContains(needle) => game
                .genres
                .iter()
                .flatten()
                .any(|genre| needle.matches(&genre.name)),
        }
    }

    /// Appends ` AND (..)` for a query where `m` is the media row.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            GameCriterion::TitleContains(needle) => {
                qb.push(" AND m.title ILIKE ");
                qb.push_bind(needle.like_pattern());
            }
            GameCriterion::DeveloperContains(needle) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM games g2 \
                     JOIN developers d ON d.id = g2.developer_id \
                     WHERE g2.media_id = m.id AND d.name ILIKE ",
                );
                qb.push_bind(needle.like_pattern());
                qb.push(")");
            }
            GameCriterion::PlatformContains(needle) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM game_platform_links gpl \
                     JOIN platforms p ON p.id = gpl.platform_id \
                     WHERE gpl.game_id = m.id AND p.name ILIKE ",
                );
                qb.push_bind(needle.like_pattern());
                qb.push(")");
            }
            GameCriterion::GenreContains(needle) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM game_genre_links ggl \
                     JOIN game_genres gg ON gg.id = ggl.genre_id \
                     WHERE ggl.game_id = m.id AND gg.name ILIKE ",
                );
                qb.push_bind(needle.like_pattern());
                qb.push(")");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieKey {
    Title,
    CrewId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieCriterion {
    TitleContains(Contains),
    Crew(CrewId),
}

impl SearchKey for MovieKey {
    type Criterion = MovieCriterion;

    fn from_key(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(MovieKey::Title),
            "crewId" | "crew_id" => Some(MovieKey::CrewId),
            _ => None,
        }
    }

    fn criterion(self, value: &str) -> Result<MovieCriterion, FieldViolation> {
        match self {
            MovieKey::Title => Ok(MovieCriterion::TitleContains(Contains::new(value))),
            MovieKey::CrewId => parse_id("crewId", value).map(MovieCriterion::Crew),
        }
    }
}

impl MovieCriterion {
    pub fn matches(&self, media: &Media) -> bool {
        let MediaDetails::Movie(movie) = &media.details else {
            return false;
        };
        match self {
            MovieCriterion::TitleContains(needle) => needle.matches(&media.title),
            MovieCriterion::Crew(crew_id) => movie
                .crew
                .iter()
                .flatten()
                .any(|role| role.key.crew_id == *crew_id),
        }
    }

    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            MovieCriterion::TitleContains(needle) => {
                qb.push(" AND m.title ILIKE ");
                qb.push_bind(needle.like_pattern());
            }
            MovieCriterion::Crew(crew_id) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM movie_crew_roles mcr \
                     WHERE mcr.movie_id = m.id AND mcr.crew_id = ",
                );
                qb.push_bind(crew_id.get());
                qb.push(")");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKey {
    UserId,
    MediaId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCriterion {
    User(UserId),
    Media(MediaId),
}

impl SearchKey for ReviewKey {
    type Criterion = ReviewCriterion;

    fn from_key(raw: &str) -> Option<Self> {
        match raw {
            "userId" | "user_id" => Some(ReviewKey::UserId),
            "mediaId" | "media_id" => Some(ReviewKey::MediaId),
            _ => None,
        }
    }

    fn criterion(self, value: &str) -> Result<ReviewCriterion, FieldViolation> {
        match self {
            ReviewKey::UserId => parse_id("userId", value).map(ReviewCriterion::User),
            ReviewKey::MediaId => parse_id("mediaId", value).map(ReviewCriterion::Media),
        }
    }
}

impl ReviewCriterion {
    pub fn matches(&self, review: &Review) -> bool {
        match self {
            ReviewCriterion::User(user_id) => review.user_id == *user_id,
            ReviewCriterion::Media(media_id) => review.media_id == *media_id,
        }
    }

    /// Appends ` AND ..` for a query where `r` is the review row.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            ReviewCriterion::User(user_id) => {
                qb.push(" AND r.user_id = ");
                qb.push_bind(user_id.get());
            }
            ReviewCriterion::Media(media_id) => {
                qb.push(" AND r.media_id = ");
                qb.push_bind(media_id.get());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Parsed search: criteria in insertion order plus the keys that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<C> {
    criteria: Vec<C>,
    ignored: Vec<String>,
}

impl<C> Filter<C> {
    /// Filter with no criteria; matches everything.
    pub fn all() -> Self {
        Self {
            criteria: Vec::new(),
            ignored: Vec::new(),
        }
    }

    pub fn criteria(&self) -> &[C] {
        &self.criteria
    }

    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored
    }

    pub fn is_unfiltered(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when every criterion accepts the item.
    pub fn accepts<T>(&self, item: &T, matches: impl Fn(&C, &T) -> bool) -> bool {
        self.criteria.iter().all(|criterion| matches(criterion, item))
    }
}

impl<C> Default for Filter<C> {
    fn default() -> Self {
        Self::all()
    }
}

pub type GameFilter = Filter<GameCriterion>;
pub type MovieFilter = Filter<MovieCriterion>;
pub type ReviewFilter = Filter<ReviewCriterion>;

/// Accumulates `(key, value)` pairs into a [`Filter`].
pub struct FilterBuilder<K: SearchKey> {
    criteria: Vec<K::Criterion>,
    ignored: Vec<String>,
    violations: Vec<FieldViolation>,
    strict: bool,
    _key: PhantomData<K>,
}

impl<K: SearchKey> fmt::Debug for FilterBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBuilder")
            .field("criteria", &self.criteria)
            .field("ignored", &self.ignored)
            .field("violations", &self.violations.len())
            .field("strict", &self.strict)
            .finish()
    }
}

impl<K: SearchKey> Default for FilterBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SearchKey> FilterBuilder<K> {
    pub fn new() -> Self {
        Self {
            criteria: Vec::new(),
            ignored: Vec::new(),
            violations: Vec::new(),
            strict: false,
            _key: PhantomData,
        }
    }

    /// Reject unknown keys instead of ignoring them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: &str) {
        if PAGING_KEYS.contains(&key) {
            return;
        }

        match K::from_key(key) {
            Some(search_key) => match search_key.criterion(value) {
                Ok(criterion) => self.criteria.push(criterion),
                Err(violation) => self.violations.push(violation),
            },
            None if self.strict => self.violations.push(FieldViolation::new(
                key,
                ErrorCode::UnknownFilterKey,
                &[("key", &key)],
            )),
            None => self.ignored.push(key.to_string()),
        }
    }

    pub fn extend<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        for (key, value) in pairs {
            self.push(key.as_ref(), value.as_ref());
        }
        self
    }

    pub fn build(self) -> Result<Filter<K::Criterion>, Vec<FieldViolation>> {
        if !self.violations.is_empty() {
            return Err(self.violations);
        }
        Ok(Filter {
            criteria: self.criteria,
            ignored: self.ignored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_skips_paging() {
        let filter = FilterBuilder::<GameKey>::new()
            .with("genre", "Action")
            .with("page", "1")
            .with("title", "zel")
            .build()
            .unwrap();

        assert_eq!(
            filter.criteria(),
            &[
                GameCriterion::GenreContains(Contains::new("action")),
                GameCriterion::TitleContains(Contains::new("zel")),
            ]
        );
        assert!(filter.ignored_keys().is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored_by_default() {
        let filter = FilterBuilder::<GameKey>::new()
            .with("colour", "red")
            .build()
            .unwrap();

        assert!(filter.is_unfiltered());
        assert_eq!(filter.ignored_keys(), &["colour".to_string()]);
    }

    #[test]
    fn unknown_keys_fail_in_strict_mode() {
        let errors = FilterBuilder::<MovieKey>::new()
            .strict(true)
            .with("colour", "red")
            .build()
            .unwrap_err();

        assert_eq!(errors[0].code, ErrorCode::UnknownFilterKey);
        assert_eq!(errors[0].message, "Unknown search key: colour");
    }

    #[test]
    fn id_keys_require_numbers() {
        let errors = FilterBuilder::<ReviewKey>::new()
            .with("userId", "abc")
            .build()
            .unwrap_err();

        assert_eq!(errors[0].message, "userId must be a numeric id: abc");
    }

    #[test]
    fn id_keys_parse_exactly() {
        let filter = FilterBuilder::<MovieKey>::new()
            .extend(vec![("crewId", "7")])
            .build()
            .unwrap();
        assert_eq!(filter.criteria(), &[MovieCriterion::Crew(CrewId(7))]);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(Contains::new("50%_off").like_pattern(), "%50\\%\\_off%");
    }

    #[test]
    fn contains_is_case_insensitive() {
        let needle = Contains::new("ZEL");
        assert!(needle.matches("The Legend of Zelda"));
        assert!(!needle.matches("Metroid"));
    }

    #[test]
    fn sql_fragments_bind_values() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT m.id FROM media m WHERE m.kind = 'GAME'");
        GameCriterion::GenreContains(Contains::new("rpg")).push_sql(&mut qb);
        GameCriterion::TitleContains(Contains::new("zel")).push_sql(&mut qb);

        let sql = qb.sql();
        assert!(sql.contains("gg.name ILIKE $1"));
        assert!(sql.ends_with("m.title ILIKE $2"));
    }
}
