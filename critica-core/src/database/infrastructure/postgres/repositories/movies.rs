use async_trait::async_trait;
use critica_model::{Media, MediaId, MediaKind, NewMovie, Page, PageRequest};
use sqlx::PgPool;
use tracing::info;

use super::common::db_err;
use super::media::{delete_media, fetch_media, search_media};
use crate::database::ports::movies::MoviesRepository;
use crate::error::{CatalogError, Result};
use crate::query::MovieFilter;

/// PostgreSQL-backed implementation of the `MoviesRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresMoviesRepository {
    pool: PgPool,
}

impl PostgresMoviesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MoviesRepository for PostgresMoviesRepository {
    async fn insert(&self, movie: &NewMovie) -> Result<Media> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(db_err("Failed to start transaction"))?;

        let media_id: i64 = sqlx::query_scalar(
            "INSERT INTO media (kind, title, release_date, description) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(MediaKind::Movie.as_str())
        .bind(&movie.title)
        .bind(movie.release_date)
        .bind(&movie.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to insert media row"))?;

        let actors: Vec<String> = movie.actors.iter().cloned().collect();
        sqlx::query("INSERT INTO movies (media_id, producer, actors) VALUES ($1, $2, $3)")
            .bind(media_id)
            .bind(&movie.producer)
            .bind(&actors)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to insert movie row"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        info!(target: "critica::movies", media_id, "created movie {}", movie.title);

        fetch_media(self.pool(), MediaId(media_id), Some(MediaKind::Movie))
            .await?
            .ok_or_else(|| CatalogError::Storage(format!("movie {media_id} vanished after insert")))
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        fetch_media(self.pool(), id, Some(MediaKind::Movie)).await
    }

    async fn search(&self, filter: &MovieFilter, page: PageRequest) -> Result<Page<Media>> {
        search_media(self.pool(), MediaKind::Movie, page, |qb| {
            for criterion in filter.criteria() {
                criterion.push_sql(qb);
            }
        })
        .await
    }

    async fn delete(&self, id: MediaId) -> Result<bool> {
        delete_media(self.pool(), id, MediaKind::Movie).await
    }
}
