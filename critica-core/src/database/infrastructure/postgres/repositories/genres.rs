use async_trait::async_trait;
use critica_model::{GameGenre, GenreId, NewNamed, Page, PageRequest};
use sqlx::PgPool;

use super::named::{NamedRow, NamedTable};
use crate::database::ports::genres::GenresRepository;
use crate::error::{Aggregate, Result};

const GENRES: NamedTable = NamedTable {
    aggregate: Aggregate::Genre,
    insert: "INSERT INTO game_genres (name) VALUES ($1) RETURNING id, name",
    by_id: "SELECT id, name FROM game_genres WHERE id = $1",
    by_name: "SELECT id, name FROM game_genres WHERE LOWER(name) = $1",
    list: "SELECT id, name FROM game_genres ORDER BY id LIMIT $1 OFFSET $2",
    count: "SELECT COUNT(*) FROM game_genres",
    delete: "DELETE FROM game_genres WHERE id = $1",
    unique_index: "game_genres_name_ci_key",
};

/// PostgreSQL-backed implementation of the `GenresRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresGenresRepository {
    pool: PgPool,
}

impl PostgresGenresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn genre(row: NamedRow) -> GameGenre {
    GameGenre {
        id: GenreId(row.id),
        name: row.name,
    }
}

#[async_trait]
impl GenresRepository for PostgresGenresRepository {
    async fn insert(&self, genre_in: &NewNamed) -> Result<GameGenre> {
        GENRES.insert(self.pool(), &genre_in.name).await.map(genre)
    }

    async fn get(&self, id: GenreId) -> Result<Option<GameGenre>> {
        Ok(GENRES.get(self.pool(), id.get()).await?.map(genre))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<GameGenre>> {
        Ok(GENRES.find_by_name(self.pool(), name).await?.map(genre))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<GameGenre>> {
        Ok(GENRES.list(self.pool(), page).await?.map(genre))
    }

    async fn delete(&self, id: GenreId) -> Result<bool> {
        GENRES.delete(self.pool(), id.get()).await
    }
}
