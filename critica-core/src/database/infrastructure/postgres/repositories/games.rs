use async_trait::async_trait;
use critica_model::{Media, MediaId, MediaKind, NewGame, Page, PageRequest};
use sqlx::PgPool;
use tracing::info;

use super::common::{db_err, violated_constraint};
use super::media::{delete_media, fetch_media, search_media};
use crate::database::ports::games::GamesRepository;
use crate::error::{Aggregate, CatalogError, Result};
use crate::query::GameFilter;

/// PostgreSQL-backed implementation of the `GamesRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresGamesRepository {
    pool: PgPool,
}

impl PostgresGamesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn ids_label<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl GamesRepository for PostgresGamesRepository {
    async fn insert(&self, game: &NewGame) -> Result<Media> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(db_err("Failed to start transaction"))?;

        let media_id: i64 = sqlx::query_scalar(
            "INSERT INTO media (kind, title, release_date, description) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(MediaKind::Game.as_str())
        .bind(&game.title)
        .bind(game.release_date)
        .bind(&game.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to insert media row"))?;

        sqlx::query("INSERT INTO games (media_id, price, developer_id) VALUES ($1, $2, $3)")
            .bind(media_id)
            .bind(game.price)
            .bind(game.developer_id.map(|id| id.get()))
            .execute(&mut *tx)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("games_developer_id_fkey") => CatalogError::not_found(
                    Aggregate::Developer,
                    game.developer_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
                _ => db_err("Failed to insert game row")(e),
            })?;

        if !game.genre_ids.is_empty() {
            let genre_ids: Vec<i64> = game.genre_ids.iter().map(|id| id.get()).collect();
            sqlx::query(
                "INSERT INTO game_genre_links (game_id, genre_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(media_id)
            .bind(&genre_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("game_genre_links_genre_id_fkey") => {
                    CatalogError::not_found(Aggregate::Genre, ids_label(&game.genre_ids))
                }
                _ => db_err("Failed to link game genres")(e),
            })?;
        }

        if !game.platform_ids.is_empty() {
            let platform_ids: Vec<i64> = game.platform_ids.iter().map(|id| id.get()).collect();
            sqlx::query(
                "INSERT INTO game_platform_links (game_id, platform_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(media_id)
            .bind(&platform_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("game_platform_links_platform_id_fkey") => {
                    CatalogError::not_found(Aggregate::Platform, ids_label(&game.platform_ids))
                }
                _ => db_err("Failed to link game platforms")(e),
            })?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        info!(target: "critica::games", media_id, "created game {}", game.title);

        fetch_media(self.pool(), MediaId(media_id), Some(MediaKind::Game))
            .await?
            .ok_or_else(|| CatalogError::Storage(format!("game {media_id} vanished after insert")))
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        fetch_media(self.pool(), id, Some(MediaKind::Game)).await
    }

    async fn search(&self, filter: &GameFilter, page: PageRequest) -> Result<Page<Media>> {
        search_media(self.pool(), MediaKind::Game, page, |qb| {
            for criterion in filter.criteria() {
                criterion.push_sql(qb);
            }
        })
        .await
    }

    async fn delete(&self, id: MediaId) -> Result<bool> {
        delete_media(self.pool(), id, MediaKind::Game).await
    }
}
