use std::collections::HashMap;

use async_trait::async_trait;
use critica_model::{
    Developer, DeveloperId, GameRef, MediaId, NewDeveloper, Page, PageRequest, normalize_name,
};
use sqlx::PgPool;
use tracing::info;

use super::common::{count, db_err, limit_offset, page_of, violated_constraint};
use crate::database::ports::developers::DevelopersRepository;
use crate::error::{Aggregate, CatalogError, Result};

/// PostgreSQL-backed implementation of the `DevelopersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresDevelopersRepository {
    pool: PgPool,
}

impl PostgresDevelopersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads games for every row in one round trip.
    async fn with_games(&self, rows: Vec<DeveloperRow>) -> Result<Vec<Developer>> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let games = sqlx::query_as::<_, DeveloperGameRow>(
            "SELECT g.developer_id, m.id, m.title \
             FROM games g JOIN media m ON m.id = g.media_id \
             WHERE g.developer_id = ANY($1) ORDER BY m.id",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(db_err("Failed to load developer games"))?;

        let mut by_developer: HashMap<i64, Vec<GameRef>> = HashMap::new();
        for game in games {
            by_developer.entry(game.developer_id).or_default().push(GameRef {
                id: MediaId(game.id),
                title: game.title,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let games = by_developer.remove(&row.id).unwrap_or_default();
                Developer {
                    id: DeveloperId(row.id),
                    name: row.name,
                    social_links: row.social_links,
                    games: Some(games),
                }
            })
            .collect())
    }

    async fn fetch_one(&self, row: Option<DeveloperRow>) -> Result<Option<Developer>> {
        match row {
            Some(row) => Ok(self.with_games(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DevelopersRepository for PostgresDevelopersRepository {
    async fn insert(&self, developer: &NewDeveloper) -> Result<Developer> {
        let name = normalize_name(&developer.name);

        let row = sqlx::query_as::<_, DeveloperRow>(
            "INSERT INTO developers (name, social_links) VALUES ($1, $2) \
             RETURNING id, name, social_links",
        )
        .bind(&name)
        .bind(&developer.social_links)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("developers_name_ci_key") => {
                CatalogError::already_exists(Aggregate::Developer, name.clone())
            }
            _ => db_err("Failed to insert developer")(e),
        })?;

        info!(target: "critica::developers", developer_id = row.id, "created developer {}", row.name);
        Ok(Developer {
            id: DeveloperId(row.id),
            name: row.name,
            social_links: row.social_links,
            games: Some(Vec::new()),
        })
    }

    async fn get(&self, id: DeveloperId) -> Result<Option<Developer>> {
        let row = sqlx::query_as::<_, DeveloperRow>(
            "SELECT id, name, social_links FROM developers WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get developer by id"))?;

        self.fetch_one(row).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Developer>> {
        let row = sqlx::query_as::<_, DeveloperRow>(
            "SELECT id, name, social_links FROM developers WHERE LOWER(name) = $1",
        )
        .bind(normalize_name(name))
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get developer by name"))?;

        self.fetch_one(row).await
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Developer>> {
        let (limit, offset) = limit_offset(page);
        let rows = sqlx::query_as::<_, DeveloperRow>(
            "SELECT id, name, social_links FROM developers ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(db_err("Failed to list developers"))?;

        let total = count(
            self.pool(),
            "SELECT COUNT(*) FROM developers",
            "Failed to count developers",
        )
        .await?;

        let content = self.with_games(rows).await?;
        Ok(page_of(content, page, total))
    }

    async fn delete(&self, id: DeveloperId) -> Result<bool> {
        // games.developer_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM developers WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(db_err("Failed to delete developer"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::developers", developer_id = %id, "deleted developer");
        }
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct DeveloperRow {
    id: i64,
    name: String,
    social_links: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct DeveloperGameRow {
    developer_id: i64,
    id: i64,
    title: String,
}
