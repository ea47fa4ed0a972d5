use async_trait::async_trait;
use chrono::{DateTime, Utc};
use critica_model::{NewUser, Page, PageRequest, User, UserId, normalize_name};
use sqlx::PgPool;
use tracing::info;

use super::common::{db_err, limit_offset, page_of, violated_constraint};
use crate::database::ports::users::UsersRepository;
use crate::error::{Aggregate, CatalogError, Result};

const USER_COLUMNS: &str = "id, username, email, joined_at, is_active";

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn insert(&self, user: &NewUser) -> Result<User> {
        let username = normalize_name(&user.username);
        let email = normalize_name(&user.email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&username)
        .bind(&email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("users_username_ci_key") => {
                CatalogError::already_exists(Aggregate::User, username.clone())
            }
            Some("users_email_ci_key") => {
                CatalogError::already_exists(Aggregate::User, email.clone())
            }
            _ => db_err("Failed to insert user")(e),
        })?;

        info!(target: "critica::users", user_id = row.id, "created user {}", row.username);
        Ok(row.into())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get user by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username.trim())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get user by username"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(self.pool())
        .await
        .map_err(db_err("Failed to get user by email"))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, page: PageRequest, include_inactive: bool) -> Result<Page<User>> {
        let (limit, offset) = limit_offset(page);
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1 OR is_active) ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(include_inactive)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(db_err("Failed to list users"))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1 OR is_active)")
            .bind(include_inactive)
            .fetch_one(self.pool())
            .await
            .map_err(db_err("Failed to count users"))?;

        Ok(page_of(rows.into_iter().map(Into::into).collect(), page, total))
    }

    async fn deactivate(&self, id: UserId) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(db_err("Failed to deactivate user"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::users", user_id = %id, "deactivated user");
        }
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    joined_at: DateTime<Utc>,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            username: row.username,
            email: row.email,
            joined_at: row.joined_at,
            is_active: row.is_active,
        }
    }
}
