use async_trait::async_trait;
use chrono::NaiveDate;
use critica_model::{
    CrewId, MovieCrew, MovieCrewKey, MovieCrewRole, NewCrewRole, NewMovieCrew, Page, PageRequest,
};
use sqlx::PgPool;
use tracing::info;

use super::common::{count, db_err, limit_offset, page_of, violated_constraint};
use super::media::{CREW_ROLE_SELECT, CrewRoleRow};
use crate::database::ports::crew::CrewRepository;
use crate::error::{Aggregate, CatalogError, Result};

/// PostgreSQL-backed implementation of the `CrewRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresCrewRepository {
    pool: PgPool,
}

impl PostgresCrewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn role_label(key: MovieCrewKey) -> String {
    format!("crew {} in movie {}", key.crew_id, key.movie_id)
}

#[async_trait]
impl CrewRepository for PostgresCrewRepository {
    async fn insert(&self, crew: &NewMovieCrew) -> Result<MovieCrew> {
        let row = sqlx::query_as::<_, CrewRow>(
            "INSERT INTO movie_crew (name, birth_date) VALUES ($1, $2) \
             RETURNING id, name, birth_date",
        )
        .bind(&crew.name)
        .bind(crew.birth_date)
        .fetch_one(self.pool())
        .await
        .map_err(db_err("Failed to insert movie crew"))?;

        info!(target: "critica::crew", crew_id = row.id, "created crew member {}", row.name);
        Ok(row.into())
    }

    async fn get(&self, id: CrewId) -> Result<Option<MovieCrew>> {
        let row = sqlx::query_as::<_, CrewRow>(
            "SELECT id, name, birth_date FROM movie_crew WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get movie crew by id"))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<MovieCrew>> {
        let (limit, offset) = limit_offset(page);
        let rows = sqlx::query_as::<_, CrewRow>(
            "SELECT id, name, birth_date FROM movie_crew ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(db_err("Failed to list movie crew"))?;

        let total = count(
            self.pool(),
            "SELECT COUNT(*) FROM movie_crew",
            "Failed to count movie crew",
        )
        .await?;

        Ok(page_of(rows.into_iter().map(Into::into).collect(), page, total))
    }

    async fn delete(&self, id: CrewId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movie_crew WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(db_err("Failed to delete movie crew"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::crew", crew_id = %id, "deleted crew member");
        }
        Ok(result.rows_affected() > 0)
    }

    async fn assign_role(&self, role: &NewCrewRole) -> Result<MovieCrewRole> {
        let key = role.key;
        let row = sqlx::query_as::<_, CrewRoleRow>(
            "WITH inserted AS ( \
                 INSERT INTO movie_crew_roles (movie_id, crew_id, role, character_name) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING movie_id, crew_id, role, character_name \
             ) \
             SELECT i.movie_id, i.crew_id, c.name AS crew_name, i.role, i.character_name \
             FROM inserted i JOIN movie_crew c ON c.id = i.crew_id",
        )
        .bind(key.movie_id.get())
        .bind(key.crew_id.get())
        .bind(role.role.as_str())
        .bind(&role.character_name)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("movie_crew_roles_pkey") => {
                CatalogError::already_exists(Aggregate::MovieCrewRole, role_label(key))
            }
            Some("movie_crew_roles_movie_id_fkey") => {
                CatalogError::not_found(Aggregate::Movie, key.movie_id)
            }
            Some("movie_crew_roles_crew_id_fkey") => {
                CatalogError::not_found(Aggregate::MovieCrew, key.crew_id)
            }
            _ => db_err("Failed to assign crew role")(e),
        })?;

        info!(
            target: "critica::crew",
            movie_id = %key.movie_id,
            crew_id = %key.crew_id,
            role = %role.role,
            "assigned crew role"
        );
        row.try_into()
    }

    async fn find_role(&self, key: MovieCrewKey) -> Result<Option<MovieCrewRole>> {
        let row = sqlx::query_as::<_, CrewRoleRow>(&format!(
            "{CREW_ROLE_SELECT} WHERE r.movie_id = $1 AND r.crew_id = $2"
        ))
        .bind(key.movie_id.get())
        .bind(key.crew_id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get crew role"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn remove_role(&self, key: MovieCrewKey) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM movie_crew_roles WHERE movie_id = $1 AND crew_id = $2")
                .bind(key.movie_id.get())
                .bind(key.crew_id.get())
                .execute(self.pool())
                .await
                .map_err(db_err("Failed to remove crew role"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct CrewRow {
    id: i64,
    name: String,
    birth_date: Option<NaiveDate>,
}

impl From<CrewRow> for MovieCrew {
    fn from(row: CrewRow) -> Self {
        MovieCrew {
            id: CrewId(row.id),
            name: row.name,
            birth_date: row.birth_date,
        }
    }
}
