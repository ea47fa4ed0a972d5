use async_trait::async_trait;
use chrono::{DateTime, Utc};
use critica_model::{Like, LikeId, MediaId, NewLike, Page, PageRequest, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::common::{db_err, is_foreign_key_violation, page_of, push_page, violated_constraint};
use crate::database::ports::likes::LikesRepository;
use crate::error::{Aggregate, CatalogError, Result};

const LIKE_SELECT: &str = "SELECT l.id, l.user_id, u.username, l.media_id, \
     m.title AS media_title, m.kind AS media_kind, l.created_at \
     FROM likes l \
     JOIN users u ON u.id = l.user_id \
     JOIN media m ON m.id = l.media_id";

/// PostgreSQL-backed implementation of the `LikesRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresLikesRepository {
    pool: PgPool,
}

impl PostgresLikesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `column` is a fixed column name, never caller input.
    async fn list_where(
        &self,
        column: Option<(&'static str, i64)>,
        page: PageRequest,
    ) -> Result<Page<Like>> {
        let mut qb = QueryBuilder::<Postgres>::new(LIKE_SELECT);
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM likes l");
        if let Some((column, value)) = column {
            for builder in [&mut qb, &mut count_qb] {
                builder.push(format!(" WHERE l.{column} = "));
                builder.push_bind(value);
            }
        }
        qb.push(" ORDER BY l.id");
        push_page(&mut qb, page);

        let rows = qb
            .build_query_as::<LikeRow>()
            .fetch_all(self.pool())
            .await
            .map_err(db_err("Failed to list likes"))?;
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(db_err("Failed to count likes"))?;

        let content = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Like>>>()?;
        Ok(page_of(content, page, total))
    }
}

#[async_trait]
impl LikesRepository for PostgresLikesRepository {
    async fn insert(&self, like: &NewLike) -> Result<Like> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO likes (user_id, media_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(like.user_id.get())
        .bind(like.media_id.get())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("likes_user_media_key") => CatalogError::AlreadyLiked {
                user: like.user_id,
                media: like.media_id,
            },
            Some("likes_user_id_fkey") => CatalogError::not_found(Aggregate::User, like.user_id),
            Some("likes_media_id_fkey") => {
                CatalogError::not_found(Aggregate::Media, like.media_id)
            }
            _ if is_foreign_key_violation(&e) => {
                CatalogError::not_found(Aggregate::Media, like.media_id)
            }
            _ => db_err("Failed to insert like")(e),
        })?;

        info!(
            target: "critica::likes",
            like_id = id,
            user_id = %like.user_id,
            media_id = %like.media_id,
            "created like"
        );

        self.get(LikeId(id))
            .await?
            .ok_or_else(|| CatalogError::Storage(format!("like {id} vanished after insert")))
    }

    async fn get(&self, id: LikeId) -> Result<Option<Like>> {
        let row = sqlx::query_as::<_, LikeRow>(&format!("{LIKE_SELECT} WHERE l.id = $1"))
            .bind(id.get())
            .fetch_optional(self.pool())
            .await
            .map_err(db_err("Failed to get like by id"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Like>> {
        self.list_where(None, page).await
    }

    async fn list_by_media(&self, media: MediaId, page: PageRequest) -> Result<Page<Like>> {
        self.list_where(Some(("media_id", media.get())), page).await
    }

    async fn list_by_user(&self, user: UserId, page: PageRequest) -> Result<Page<Like>> {
        self.list_where(Some(("user_id", user.get())), page).await
    }

    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE user_id = $1 AND media_id = $2)",
        )
        .bind(user.get())
        .bind(media.get())
        .fetch_one(self.pool())
        .await
        .map_err(db_err("Failed to check like existence"))
    }

    async fn delete(&self, id: LikeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(db_err("Failed to delete like"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::likes", like_id = %id, "deleted like");
        }
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    id: i64,
    user_id: i64,
    username: String,
    media_id: i64,
    media_title: String,
    media_kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LikeRow> for Like {
    type Error = CatalogError;

    fn try_from(row: LikeRow) -> Result<Self> {
        Ok(Like {
            id: LikeId(row.id),
            user_id: UserId(row.user_id),
            username: row.username,
            media_id: MediaId(row.media_id),
            media_title: row.media_title,
            media_kind: row.media_kind.parse()?,
            created_at: row.created_at,
        })
    }
}
