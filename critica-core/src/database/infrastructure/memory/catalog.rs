use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use critica_model::{
    CrewId, CrewRole, Developer, DeveloperId, DeveloperRef, GameDetails, GameGenre, GameRef, GenreId, Like,
    LikeId, Media, MediaDetails, MediaId, MediaKind, MediaStats, MovieCrew, MovieCrewKey,
    MovieCrewRole, MovieDetails, NewCrewRole, NewDeveloper, NewGame, NewLike, NewMovie,
    NewMovieCrew, NewNamed, NewReview, NewUser, Page, PageRequest, Platform, PlatformId, Review,
    ReviewId, ReviewPatch, User, UserId, normalize_name,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::info;

use crate::database::ports::{
    crew::CrewRepository, developers::DevelopersRepository, games::GamesRepository,
    genres::GenresRepository, likes::LikesRepository, media::MediaRepository,
    movies::MoviesRepository, platforms::PlatformsRepository, reviews::ReviewsRepository,
    users::UsersRepository,
};
use crate::error::{Aggregate, CatalogError, Result};
use crate::query::{GameFilter, MovieFilter, ReviewFilter};

/// Process-local catalog implementing every repository port.
///
/// Enforces the same unique keys, reference checks and cascades as the
/// Postgres schema. Rows are kept in id order so listings match `ORDER BY id`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct Sequences {
    user: i64,
    developer: i64,
    platform: i64,
    genre: i64,
    media: i64,
    crew: i64,
    like: i64,
    review: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Debug, Clone)]
struct DeveloperRecord {
    name: String,
    social_links: Vec<String>,
}

#[derive(Debug, Clone)]
enum StoredDetails {
    Game {
        price: Decimal,
        developer_id: Option<DeveloperId>,
        genre_ids: BTreeSet<GenreId>,
        platform_ids: BTreeSet<PlatformId>,
    },
    Movie {
        producer: String,
        actors: BTreeSet<String>,
    },
}

#[derive(Debug, Clone)]
struct MediaRecord {
    title: String,
    release_date: Option<NaiveDate>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    details: StoredDetails,
}

impl MediaRecord {
    fn kind(&self) -> MediaKind {
        match self.details {
            StoredDetails::Game { .. } => MediaKind::Game,
            StoredDetails::Movie { .. } => MediaKind::Movie,
        }
    }
}

#[derive(Debug, Clone)]
struct RoleRecord {
    role: CrewRole,
    character_name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct LikeRecord {
    user_id: UserId,
    media_id: MediaId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ReviewRecord {
    user_id: UserId,
    media_id: MediaId,
    score: i16,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CatalogState {
    seq: Sequences,
    users: BTreeMap<UserId, User>,
    developers: BTreeMap<DeveloperId, DeveloperRecord>,
    platforms: BTreeMap<PlatformId, String>,
    genres: BTreeMap<GenreId, String>,
    media: BTreeMap<MediaId, MediaRecord>,
    crew: BTreeMap<CrewId, MovieCrew>,
    roles: BTreeMap<MovieCrewKey, RoleRecord>,
    likes: BTreeMap<LikeId, LikeRecord>,
    reviews: BTreeMap<ReviewId, ReviewRecord>,
}

impl CatalogState {
    fn developer(&self, id: DeveloperId) -> Option<Developer> {
        let record = self.developers.get(&id)?;
        let games = self
            .media
            .iter()
            .filter(|(_, media)| {
                matches!(media.details, StoredDetails::Game { developer_id: Some(dev), .. } if dev == id)
            })
            .map(|(media_id, media)| GameRef {
                id: *media_id,
                title: media.title.clone(),
            })
            .collect();
        Some(Developer {
            id,
            name: record.name.clone(),
            social_links: record.social_links.clone(),
            games: Some(games),
        })
    }

    fn stats(&self, id: MediaId) -> MediaStats {
        MediaStats {
            likes: self.likes.values().filter(|l| l.media_id == id).count() as i64,
            reviews: self.reviews.values().filter(|r| r.media_id == id).count() as i64,
        }
    }

    fn crew_of(&self, movie: MediaId) -> Vec<MovieCrewRole> {
        self.roles
            .range(MovieCrewKey::new(movie, CrewId(i64::MIN))..=MovieCrewKey::new(movie, CrewId(i64::MAX)))
            .map(|(key, record)| self.role(*key, record))
            .collect()
    }

    fn role(&self, key: MovieCrewKey, record: &RoleRecord) -> MovieCrewRole {
        MovieCrewRole {
            key,
            crew_name: self
                .crew
                .get(&key.crew_id)
                .map(|crew| crew.name.clone())
                .unwrap_or_default(),
            role: record.role,
            character_name: record.character_name.clone(),
        }
    }

    fn media(&self, id: MediaId) -> Option<Media> {
        let record = self.media.get(&id)?;
        let details = match &record.details {
            StoredDetails::Game {
                price,
                developer_id,
                genre_ids,
                platform_ids,
            } => MediaDetails::Game(GameDetails {
                price: *price,
                developer: developer_id.and_then(|dev_id| {
                    self.developers.get(&dev_id).map(|dev| DeveloperRef {
                        id: dev_id,
                        name: dev.name.clone(),
                    })
                }),
                genres: Some(
                    genre_ids
                        .iter()
                        .filter_map(|gid| {
                            self.genres.get(gid).map(|name| GameGenre {
                                id: *gid,
                                name: name.clone(),
                            })
                        })
                        .collect(),
                ),
                platforms: Some(
                    platform_ids
                        .iter()
                        .filter_map(|pid| {
                            self.platforms.get(pid).map(|name| Platform {
                                id: *pid,
                                name: name.clone(),
                            })
                        })
                        .collect(),
                ),
            }),
            StoredDetails::Movie { producer, actors } => MediaDetails::Movie(MovieDetails {
                producer: producer.clone(),
                actors: actors.clone(),
                crew: Some(self.crew_of(id)),
            }),
        };

        Some(Media {
            id,
            title: record.title.clone(),
            release_date: record.release_date,
            description: record.description.clone(),
            created_at: record.created_at,
            stats: self.stats(id),
            details,
        })
    }

    fn media_of_kind(&self, id: MediaId, kind: MediaKind) -> Option<Media> {
        match self.media.get(&id) {
            Some(record) if record.kind() == kind => self.media(id),
            _ => None,
        }
    }

    fn all_media(&self, kind: MediaKind) -> Vec<Media> {
        self.media
            .iter()
            .filter(|(_, record)| record.kind() == kind)
            .filter_map(|(id, _)| self.media(*id))
            .collect()
    }

    fn like(&self, id: LikeId) -> Option<Like> {
        let record = self.likes.get(&id)?;
        let user = self.users.get(&record.user_id)?;
        let media = self.media.get(&record.media_id)?;
        Some(Like {
            id,
            user_id: record.user_id,
            username: user.username.clone(),
            media_id: record.media_id,
            media_title: media.title.clone(),
            media_kind: media.kind(),
            created_at: record.created_at,
        })
    }

    fn review(&self, id: ReviewId) -> Option<Review> {
        let record = self.reviews.get(&id)?;
        let user = self.users.get(&record.user_id)?;
        let media = self.media.get(&record.media_id)?;
        Some(Review {
            id,
            user_id: record.user_id,
            username: user.username.clone(),
            media_id: record.media_id,
            media_title: media.title.clone(),
            media_kind: media.kind(),
            score: record.score,
            text: record.text.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Cascades to likes, reviews and crew roles.
    fn remove_media(&mut self, id: MediaId, kind: MediaKind) -> bool {
        match self.media.get(&id) {
            Some(record) if record.kind() == kind => {}
            _ => return false,
        }
        self.media.remove(&id);
        self.likes.retain(|_, like| like.media_id != id);
        self.reviews.retain(|_, review| review.media_id != id);
        self.roles.retain(|key, _| key.movie_id != id);
        info!(target: "critica::media", media_id = %id, kind = %kind, "deleted media");
        true
    }
}

fn named_exists<K>(rows: &BTreeMap<K, String>, name: &str) -> bool {
    rows.values().any(|existing| *existing == name)
}

fn find_named<K: Copy>(rows: &BTreeMap<K, String>, name: &str) -> Option<(K, String)> {
    let name = normalize_name(name);
    rows.iter()
        .find(|(_, existing)| **existing == name)
        .map(|(id, existing)| (*id, existing.clone()))
}

#[async_trait]
impl UsersRepository for InMemoryCatalog {
    async fn insert(&self, user: &NewUser) -> Result<User> {
        let mut state = self.state.lock().await;
        let username = normalize_name(&user.username);
        let email = normalize_name(&user.email);

        if state.users.values().any(|u| u.username == username) {
            return Err(CatalogError::already_exists(Aggregate::User, username));
        }
        if state.users.values().any(|u| u.email == email) {
            return Err(CatalogError::already_exists(Aggregate::User, email));
        }

        let id = UserId(next(&mut state.seq.user));
        let created = User {
            id,
            username,
            email,
            joined_at: Utc::now(),
            is_active: true,
        };
        state.users.insert(id, created.clone());
        info!(target: "critica::users", user_id = %id, "created user {}", created.username);
        Ok(created)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = normalize_name(username);
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_name(email);
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: PageRequest, include_inactive: bool) -> Result<Page<User>> {
        let state = self.state.lock().await;
        let users: Vec<User> = state
            .users
            .values()
            .filter(|u| include_inactive || u.is_active)
            .cloned()
            .collect();
        Ok(Page::from_slice(&users, page))
    }

    async fn deactivate(&self, id: UserId) -> Result<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.is_active = false;
                info!(target: "critica::users", user_id = %id, "deactivated user");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DevelopersRepository for InMemoryCatalog {
    async fn insert(&self, developer: &NewDeveloper) -> Result<Developer> {
        let mut state = self.state.lock().await;
        let name = normalize_name(&developer.name);
        if state.developers.values().any(|d| d.name == name) {
            return Err(CatalogError::already_exists(Aggregate::Developer, name));
        }

        let id = DeveloperId(next(&mut state.seq.developer));
        state.developers.insert(
            id,
            DeveloperRecord {
                name: name.clone(),
                social_links: developer.social_links.clone(),
            },
        );
        info!(target: "critica::developers", developer_id = %id, "created developer {name}");
        state
            .developer(id)
            .ok_or_else(|| CatalogError::Storage(format!("developer {id} vanished after insert")))
    }

    async fn get(&self, id: DeveloperId) -> Result<Option<Developer>> {
        Ok(self.state.lock().await.developer(id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Developer>> {
        let name = normalize_name(name);
        let state = self.state.lock().await;
        let id = state
            .developers
            .iter()
            .find(|(_, d)| d.name == name)
            .map(|(id, _)| *id);
        Ok(id.and_then(|id| state.developer(id)))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Developer>> {
        let state = self.state.lock().await;
        let all: Vec<Developer> = state
            .developers
            .keys()
            .filter_map(|id| state.developer(*id))
            .collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn delete(&self, id: DeveloperId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.developers.remove(&id).is_none() {
            return Ok(false);
        }
        for media in state.media.values_mut() {
            if let StoredDetails::Game { developer_id, .. } = &mut media.details
                && *developer_id == Some(id)
            {
                *developer_id = None;
            }
        }
        info!(target: "critica::developers", developer_id = %id, "deleted developer");
        Ok(true)
    }
}

#[async_trait]
impl PlatformsRepository for InMemoryCatalog {
    async fn insert(&self, platform: &NewNamed) -> Result<Platform> {
        let mut state = self.state.lock().await;
        let name = normalize_name(&platform.name);
        if named_exists(&state.platforms, &name) {
            return Err(CatalogError::already_exists(Aggregate::Platform, name));
        }
        let id = PlatformId(next(&mut state.seq.platform));
        state.platforms.insert(id, name.clone());
        info!(target: "critica::catalog", id = %id, "created Platform {name}");
        Ok(Platform { id, name })
    }

    async fn get(&self, id: PlatformId) -> Result<Option<Platform>> {
        let state = self.state.lock().await;
        Ok(state.platforms.get(&id).map(|name| Platform {
            id,
            name: name.clone(),
        }))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Platform>> {
        let state = self.state.lock().await;
        Ok(find_named(&state.platforms, name).map(|(id, name)| Platform { id, name }))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Platform>> {
        let state = self.state.lock().await;
        let all: Vec<Platform> = state
            .platforms
            .iter()
            .map(|(id, name)| Platform {
                id: *id,
                name: name.clone(),
            })
            .collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn delete(&self, id: PlatformId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.platforms.remove(&id).is_none() {
            return Ok(false);
        }
        for media in state.media.values_mut() {
            if let StoredDetails::Game { platform_ids, .. } = &mut media.details {
                platform_ids.remove(&id);
            }
        }
        info!(target: "critica::catalog", id = %id, "deleted Platform");
        Ok(true)
    }
}

#[async_trait]
impl GenresRepository for InMemoryCatalog {
    async fn insert(&self, genre: &NewNamed) -> Result<GameGenre> {
        let mut state = self.state.lock().await;
        let name = normalize_name(&genre.name);
        if named_exists(&state.genres, &name) {
            return Err(CatalogError::already_exists(Aggregate::Genre, name));
        }
        let id = GenreId(next(&mut state.seq.genre));
        state.genres.insert(id, name.clone());
        info!(target: "critica::catalog", id = %id, "created Genre {name}");
        Ok(GameGenre { id, name })
    }

    async fn get(&self, id: GenreId) -> Result<Option<GameGenre>> {
        let state = self.state.lock().await;
        Ok(state.genres.get(&id).map(|name| GameGenre {
            id,
            name: name.clone(),
        }))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<GameGenre>> {
        let state = self.state.lock().await;
        Ok(find_named(&state.genres, name).map(|(id, name)| GameGenre { id, name }))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<GameGenre>> {
        let state = self.state.lock().await;
        let all: Vec<GameGenre> = state
            .genres
            .iter()
            .map(|(id, name)| GameGenre {
                id: *id,
                name: name.clone(),
            })
            .collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn delete(&self, id: GenreId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.genres.remove(&id).is_none() {
            return Ok(false);
        }
        for media in state.media.values_mut() {
            if let StoredDetails::Game { genre_ids, .. } = &mut media.details {
                genre_ids.remove(&id);
            }
        }
        info!(target: "critica::catalog", id = %id, "deleted Genre");
        Ok(true)
    }
}

#[async_trait]
impl MediaRepository for InMemoryCatalog {
    async fn get_media(&self, id: MediaId) -> Result<Option<Media>> {
        Ok(self.state.lock().await.media(id))
    }

    async fn exists(&self, id: MediaId) -> Result<bool> {
        Ok(self.state.lock().await.media.contains_key(&id))
    }
}

#[async_trait]
impl GamesRepository for InMemoryCatalog {
    async fn insert(&self, game: &NewGame) -> Result<Media> {
        let mut state = self.state.lock().await;

        if let Some(dev_id) = game.developer_id
            && !state.developers.contains_key(&dev_id)
        {
            return Err(CatalogError::not_found(Aggregate::Developer, dev_id));
        }
        if let Some(missing) = game.genre_ids.iter().find(|id| !state.genres.contains_key(id)) {
            return Err(CatalogError::not_found(Aggregate::Genre, missing));
        }
        if let Some(missing) = game
            .platform_ids
            .iter()
            .find(|id| !state.platforms.contains_key(id))
        {
            return Err(CatalogError::not_found(Aggregate::Platform, missing));
        }

        let id = MediaId(next(&mut state.seq.media));
        state.media.insert(
            id,
            MediaRecord {
                title: game.title.clone(),
                release_date: game.release_date,
                description: game.description.clone(),
                created_at: Utc::now(),
                details: StoredDetails::Game {
                    price: game.price,
                    developer_id: game.developer_id,
                    genre_ids: game.genre_ids.iter().copied().collect(),
                    platform_ids: game.platform_ids.iter().copied().collect(),
                },
            },
        );
        info!(target: "critica::games", media_id = %id, "created game {}", game.title);
        state
            .media(id)
            .ok_or_else(|| CatalogError::Storage(format!("game {id} vanished after insert")))
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        Ok(self.state.lock().await.media_of_kind(id, MediaKind::Game))
    }

    async fn search(&self, filter: &GameFilter, page: PageRequest) -> Result<Page<Media>> {
        let state = self.state.lock().await;
        let matching: Vec<Media> = state
            .all_media(MediaKind::Game)
            .into_iter()
            .filter(|media| filter.accepts(media, |criterion, media| criterion.matches(media)))
            .collect();
        Ok(Page::from_slice(&matching, page))
    }

    async fn delete(&self, id: MediaId) -> Result<bool> {
        Ok(self.state.lock().await.remove_media(id, MediaKind::Game))
    }
}

#[async_trait]
impl MoviesRepository for InMemoryCatalog {
    async fn insert(&self, movie: &NewMovie) -> Result<Media> {
        let mut state = self.state.lock().await;
        let id = MediaId(next(&mut state.seq.media));
        state.media.insert(
            id,
            MediaRecord {
                title: movie.title.clone(),
                release_date: movie.release_date,
                description: movie.description.clone(),
                created_at: Utc::now(),
                details: StoredDetails::Movie {
                    producer: movie.producer.clone(),
                    actors: movie.actors.clone(),
                },
            },
        );
        info!(target: "critica::movies", media_id = %id, "created movie {}", movie.title);
        state
            .media(id)
            .ok_or_else(|| CatalogError::Storage(format!("movie {id} vanished after insert")))
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        Ok(self.state.lock().await.media_of_kind(id, MediaKind::Movie))
    }

    async fn search(&self, filter: &MovieFilter, page: PageRequest) -> Result<Page<Media>> {
        let state = self.state.lock().await;
        let matching: Vec<Media> = state
            .all_media(MediaKind::Movie)
            .into_iter()
            .filter(|media| filter.accepts(media, |criterion, media| criterion.matches(media)))
            .collect();
        Ok(Page::from_slice(&matching, page))
    }

    async fn delete(&self, id: MediaId) -> Result<bool> {
        Ok(self.state.lock().await.remove_media(id, MediaKind::Movie))
    }
}

#[async_trait]
impl CrewRepository for InMemoryCatalog {
    async fn insert(&self, crew: &NewMovieCrew) -> Result<MovieCrew> {
        let mut state = self.state.lock().await;
        let id = CrewId(next(&mut state.seq.crew));
        let created = MovieCrew {
            id,
            name: crew.name.clone(),
            birth_date: crew.birth_date,
        };
        state.crew.insert(id, created.clone());
        info!(target: "critica::crew", crew_id = %id, "created crew member {}", created.name);
        Ok(created)
    }

    async fn get(&self, id: CrewId) -> Result<Option<MovieCrew>> {
        Ok(self.state.lock().await.crew.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<MovieCrew>> {
        let state = self.state.lock().await;
        let all: Vec<MovieCrew> = state.crew.values().cloned().collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn delete(&self, id: CrewId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.crew.remove(&id).is_none() {
            return Ok(false);
        }
        state.roles.retain(|key, _| key.crew_id != id);
        info!(target: "critica::crew", crew_id = %id, "deleted crew member");
        Ok(true)
    }

    async fn assign_role(&self, role: &NewCrewRole) -> Result<MovieCrewRole> {
        let mut state = self.state.lock().await;
        let key = role.key;

        match state.media.get(&key.movie_id) {
            Some(record) if record.kind() == MediaKind::Movie => {}
            _ => return Err(CatalogError::not_found(Aggregate::Movie, key.movie_id)),
        }
        if !state.crew.contains_key(&key.crew_id) {
            return Err(CatalogError::not_found(Aggregate::MovieCrew, key.crew_id));
        }
        if state.roles.contains_key(&key) {
            return Err(CatalogError::already_exists(
                Aggregate::MovieCrewRole,
                format!("crew {} in movie {}", key.crew_id, key.movie_id),
            ));
        }

        let record = RoleRecord {
            role: role.role,
            character_name: role.character_name.clone(),
        };
        let assigned = state.role(key, &record);
        state.roles.insert(key, record);
        info!(
            target: "critica::crew",
            movie_id = %key.movie_id,
            crew_id = %key.crew_id,
            role = %role.role,
            "assigned crew role"
        );
        Ok(assigned)
    }

    async fn find_role(&self, key: MovieCrewKey) -> Result<Option<MovieCrewRole>> {
        let state = self.state.lock().await;
        Ok(state.roles.get(&key).map(|record| state.role(key, record)))
    }

    async fn remove_role(&self, key: MovieCrewKey) -> Result<bool> {
        Ok(self.state.lock().await.roles.remove(&key).is_some())
    }
}

#[async_trait]
impl LikesRepository for InMemoryCatalog {
    async fn insert(&self, like: &NewLike) -> Result<Like> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&like.user_id) {
            return Err(CatalogError::not_found(Aggregate::User, like.user_id));
        }
        if !state.media.contains_key(&like.media_id) {
            return Err(CatalogError::not_found(Aggregate::Media, like.media_id));
        }
        if state
            .likes
            .values()
            .any(|l| l.user_id == like.user_id && l.media_id == like.media_id)
        {
            return Err(CatalogError::AlreadyLiked {
                user: like.user_id,
                media: like.media_id,
            });
        }

        let id = LikeId(next(&mut state.seq.like));
        state.likes.insert(
            id,
            LikeRecord {
                user_id: like.user_id,
                media_id: like.media_id,
                created_at: Utc::now(),
            },
        );
        info!(
            target: "critica::likes",
            like_id = %id,
            user_id = %like.user_id,
            media_id = %like.media_id,
            "created like"
        );
        state
            .like(id)
            .ok_or_else(|| CatalogError::Storage(format!("like {id} vanished after insert")))
    }

    async fn get(&self, id: LikeId) -> Result<Option<Like>> {
        Ok(self.state.lock().await.like(id))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Like>> {
        let state = self.state.lock().await;
        let all: Vec<Like> = state.likes.keys().filter_map(|id| state.like(*id)).collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn list_by_media(&self, media: MediaId, page: PageRequest) -> Result<Page<Like>> {
        let state = self.state.lock().await;
        let all: Vec<Like> = state
            .likes
            .iter()
            .filter(|(_, l)| l.media_id == media)
            .filter_map(|(id, _)| state.like(*id))
            .collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn list_by_user(&self, user: UserId, page: PageRequest) -> Result<Page<Like>> {
        let state = self.state.lock().await;
        let all: Vec<Like> = state
            .likes
            .iter()
            .filter(|(_, l)| l.user_id == user)
            .filter_map(|(id, _)| state.like(*id))
            .collect();
        Ok(Page::from_slice(&all, page))
    }

    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .likes
            .values()
            .any(|l| l.user_id == user && l.media_id == media))
    }

    async fn delete(&self, id: LikeId) -> Result<bool> {
        let removed = self.state.lock().await.likes.remove(&id).is_some();
        if removed {
            info!(target: "critica::likes", like_id = %id, "deleted like");
        }
        Ok(removed)
    }
}

#[async_trait]
impl ReviewsRepository for InMemoryCatalog {
    async fn insert(&self, review: &NewReview) -> Result<Review> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&review.user_id) {
            return Err(CatalogError::not_found(Aggregate::User, review.user_id));
        }
        if !state.media.contains_key(&review.media_id) {
            return Err(CatalogError::not_found(Aggregate::Media, review.media_id));
        }
        if state
            .reviews
            .values()
            .any(|r| r.user_id == review.user_id && r.media_id == review.media_id)
        {
            return Err(CatalogError::AlreadyReviewed {
                user: review.user_id,
                media: review.media_id,
            });
        }

        let id = ReviewId(next(&mut state.seq.review));
        let now = Utc::now();
        state.reviews.insert(
            id,
            ReviewRecord {
                user_id: review.user_id,
                media_id: review.media_id,
                score: review.score,
                text: review.text.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        info!(
            target: "critica::reviews",
            review_id = %id,
            user_id = %review.user_id,
            media_id = %review.media_id,
            "created review"
        );
        state
            .review(id)
            .ok_or_else(|| CatalogError::Storage(format!("review {id} vanished after insert")))
    }

    async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        Ok(self.state.lock().await.review(id))
    }

    async fn search(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>> {
        let state = self.state.lock().await;
        let matching: Vec<Review> = state
            .reviews
            .keys()
            .filter_map(|id| state.review(*id))
            .filter(|review| filter.accepts(review, |criterion, review| criterion.matches(review)))
            .collect();
        Ok(Page::from_slice(&matching, page))
    }

    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .reviews
            .values()
            .any(|r| r.user_id == user && r.media_id == media))
    }

    async fn update(&self, id: ReviewId, patch: &ReviewPatch) -> Result<Option<Review>> {
        let mut state = self.state.lock().await;
        let Some(mut review) = state.review(id) else {
            return Ok(None);
        };
        patch.apply(&mut review);
        review.updated_at = Utc::now();
        if let Some(record) = state.reviews.get_mut(&id) {
            record.score = review.score;
            record.text.clone_from(&review.text);
            record.updated_at = review.updated_at;
        }
        info!(target: "critica::reviews", review_id = %id, "updated review");
        Ok(Some(review))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        let removed = self.state.lock().await.reviews.remove(&id).is_some();
        if removed {
            info!(target: "critica::reviews", review_id = %id, "deleted review");
        }
        Ok(removed)
    }
}
