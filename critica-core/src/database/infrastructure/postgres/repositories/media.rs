use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use critica_model::{
    CrewId, DeveloperId, DeveloperRef, GameDetails, GameGenre, GenreId, Media, MediaDetails,
    MediaId, MediaKind, MediaStats, MovieCrewKey, MovieCrewRole, MovieDetails, Page, PageRequest,
    Platform, PlatformId,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::common::{db_err, page_of, push_page};
use crate::database::ports::media::MediaRepository;
use crate::error::{CatalogError, Result};

/// Media row with the kind specific columns and query-time counts.
pub(super) const MEDIA_SELECT: &str = "SELECT m.id, m.kind, m.title, m.release_date, \
     m.description, m.created_at, \
     (SELECT COUNT(*) FROM likes l WHERE l.media_id = m.id) AS like_count, \
     (SELECT COUNT(*) FROM reviews rv WHERE rv.media_id = m.id) AS review_count, \
     g.price, g.developer_id, d.name AS developer_name, \
     mv.producer, mv.actors \
     FROM media m \
     LEFT JOIN games g ON g.media_id = m.id \
     LEFT JOIN developers d ON d.id = g.developer_id \
     LEFT JOIN movies mv ON mv.media_id = m.id";

pub(super) const CREW_ROLE_SELECT: &str = "SELECT r.movie_id, r.crew_id, c.name AS crew_name, \
     r.role, r.character_name \
     FROM movie_crew_roles r JOIN movie_crew c ON c.id = r.crew_id";

/// PostgreSQL-backed implementation of the `MediaRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresMediaRepository {
    pool: PgPool,
}

impl PostgresMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn get_media(&self, id: MediaId) -> Result<Option<Media>> {
        fetch_media(self.pool(), id, None).await
    }

    async fn exists(&self, id: MediaId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM media WHERE id = $1)")
            .bind(id.get())
            .fetch_one(self.pool())
            .await
            .map_err(db_err("Failed to check media existence"))
    }
}

/// One media row, optionally restricted to a kind, with relations loaded.
pub(super) async fn fetch_media(
    pool: &PgPool,
    id: MediaId,
    kind: Option<MediaKind>,
) -> Result<Option<Media>> {
    let mut qb = QueryBuilder::<Postgres>::new(MEDIA_SELECT);
    qb.push(" WHERE m.id = ");
    qb.push_bind(id.get());
    if let Some(kind) = kind {
        qb.push(" AND m.kind = ");
        qb.push_bind(kind.as_str());
    }

    let row = qb
        .build_query_as::<MediaRow>()
        .fetch_optional(pool)
        .await
        .map_err(db_err("Failed to get media by id"))?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Paged media of one kind; `push_criteria` appends ` AND ..` fragments.
pub(super) async fn search_media(
    pool: &PgPool,
    kind: MediaKind,
    page: PageRequest,
    push_criteria: impl Fn(&mut QueryBuilder<'_, Postgres>),
) -> Result<Page<Media>> {
    let mut qb = QueryBuilder::<Postgres>::new(MEDIA_SELECT);
    qb.push(" WHERE m.kind = ");
    qb.push_bind(kind.as_str());
    push_criteria(&mut qb);
    qb.push(" ORDER BY m.id");
    push_page(&mut qb, page);

    let rows = qb
        .build_query_as::<MediaRow>()
        .fetch_all(pool)
        .await
        .map_err(db_err("Failed to search media"))?;

    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM media m WHERE m.kind = ");
    count_qb.push_bind(kind.as_str());
    push_criteria(&mut count_qb);
    let total = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
        .map_err(db_err("Failed to count media"))?;

    let content = hydrate(pool, rows).await?;
    Ok(page_of(content, page, total))
}

/// Likes, reviews, kind rows, links and crew roles go through cascades.
pub(super) async fn delete_media(pool: &PgPool, id: MediaId, kind: MediaKind) -> Result<bool> {
    let result = sqlx::query("DELETE FROM media WHERE id = $1 AND kind = $2")
        .bind(id.get())
        .bind(kind.as_str())
        .execute(pool)
        .await
        .map_err(db_err("Failed to delete media"))?;

    if result.rows_affected() > 0 {
        info!(target: "critica::media", media_id = %id, kind = %kind, "deleted media");
    }
    Ok(result.rows_affected() > 0)
}

/// Loads genres, platforms and crew for a batch of media rows.
pub(super) async fn hydrate(pool: &PgPool, rows: Vec<MediaRow>) -> Result<Vec<Media>> {
    let mut game_ids = Vec::new();
    let mut movie_ids = Vec::new();
    for row in &rows {
        match row.kind.parse::<MediaKind>()? {
            MediaKind::Game => game_ids.push(row.id),
            MediaKind::Movie => movie_ids.push(row.id),
        }
    }

    let mut genres = load_named(
        pool,
        "SELECT ggl.game_id AS owner_id, gg.id, gg.name \
         FROM game_genre_links ggl JOIN game_genres gg ON gg.id = ggl.genre_id \
         WHERE ggl.game_id = ANY($1) ORDER BY gg.id",
        &game_ids,
    )
    .await?;
    let mut platforms = load_named(
        pool,
        "SELECT gpl.game_id AS owner_id, p.id, p.name \
         FROM game_platform_links gpl JOIN platforms p ON p.id = gpl.platform_id \
         WHERE gpl.game_id = ANY($1) ORDER BY p.id",
        &game_ids,
    )
    .await?;
    let mut crew = load_crew(pool, &movie_ids).await?;

    rows.into_iter()
        .map(|row| -> Result<Media> {
            let details = match row.kind.parse::<MediaKind>()? {
                MediaKind::Game => MediaDetails::Game(GameDetails {
                    price: row.price.ok_or_else(|| missing_row("game", row.id))?,
                    developer: row.developer_id.zip(row.developer_name.clone()).map(
                        |(id, name)| DeveloperRef {
                            id: DeveloperId(id),
                            name,
                        },
                    ),
                    genres: Some(
                        genres
                            .remove(&row.id)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|(id, name)| GameGenre {
                                id: GenreId(id),
                                name,
                            })
                            .collect(),
                    ),
                    platforms: Some(
                        platforms
                            .remove(&row.id)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|(id, name)| Platform {
                                id: PlatformId(id),
                                name,
                            })
                            .collect(),
                    ),
                }),
                MediaKind::Movie => MediaDetails::Movie(MovieDetails {
                    producer: row
                        .producer
                        .clone()
                        .ok_or_else(|| missing_row("movie", row.id))?,
                    actors: row
                        .actors
                        .clone()
                        .unwrap_or_default()
                        .into_iter()
                        .collect::<BTreeSet<_>>(),
                    crew: Some(crew.remove(&row.id).unwrap_or_default()),
                }),
            };

            Ok(Media {
                id: MediaId(row.id),
                title: row.title,
                release_date: row.release_date,
                description: row.description,
                created_at: row.created_at,
                stats: MediaStats {
                    likes: row.like_count,
                    reviews: row.review_count,
                },
                details,
            })
        })
        .collect()
}

fn missing_row(kind: &str, id: i64) -> CatalogError {
    CatalogError::Storage(format!("media {id} has no {kind} row"))
}

async fn load_named(
    pool: &PgPool,
    sql: &'static str,
    owners: &[i64],
) -> Result<HashMap<i64, Vec<(i64, String)>>> {
    let mut by_owner: HashMap<i64, Vec<(i64, String)>> = HashMap::new();
    if owners.is_empty() {
        return Ok(by_owner);
    }

    let rows = sqlx::query_as::<_, LinkedNameRow>(sql)
        .bind(owners)
        .fetch_all(pool)
        .await
        .map_err(db_err("Failed to load game links"))?;

    for row in rows {
        by_owner.entry(row.owner_id).or_default().push((row.id, row.name));
    }
    Ok(by_owner)
}

async fn load_crew(pool: &PgPool, movies: &[i64]) -> Result<HashMap<i64, Vec<MovieCrewRole>>> {
    let mut by_movie: HashMap<i64, Vec<MovieCrewRole>> = HashMap::new();
    if movies.is_empty() {
        return Ok(by_movie);
    }

    let rows = sqlx::query_as::<_, CrewRoleRow>(&format!(
        "{CREW_ROLE_SELECT} WHERE r.movie_id = ANY($1) ORDER BY r.crew_id"
    ))
    .bind(movies)
    .fetch_all(pool)
    .await
    .map_err(db_err("Failed to load movie crew"))?;

    for row in rows {
        let movie_id = row.movie_id;
        by_movie.entry(movie_id).or_default().push(row.try_into()?);
    }
    Ok(by_movie)
}

#[derive(sqlx::FromRow)]
pub(super) struct MediaRow {
    id: i64,
    kind: String,
    title: String,
    release_date: Option<NaiveDate>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    like_count: i64,
    review_count: i64,
    price: Option<Decimal>,
    developer_id: Option<i64>,
    developer_name: Option<String>,
    producer: Option<String>,
    actors: Option<Vec<String>>,
}

#[derive(sqlx::FromRow)]
struct LinkedNameRow {
    owner_id: i64,
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
pub(super) struct CrewRoleRow {
    movie_id: i64,
    crew_id: i64,
    crew_name: String,
    role: String,
    character_name: Option<String>,
}

impl TryFrom<CrewRoleRow> for MovieCrewRole {
    type Error = CatalogError;

    fn try_from(row: CrewRoleRow) -> Result<Self> {
        Ok(MovieCrewRole {
            key: MovieCrewKey::new(MediaId(row.movie_id), CrewId(row.crew_id)),
            crew_name: row.crew_name,
            role: row.role.parse()?,
            character_name: row.character_name,
        })
    }
}
