use async_trait::async_trait;
use chrono::{DateTime, Utc};
use critica_model::{MediaId, NewReview, Page, PageRequest, Review, ReviewId, ReviewPatch, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::common::{db_err, is_foreign_key_violation, page_of, push_page, violated_constraint};
use crate::database::ports::reviews::ReviewsRepository;
use crate::error::{Aggregate, CatalogError, Result};
use crate::query::ReviewFilter;

const REVIEW_SELECT: &str = "SELECT r.id, r.user_id, u.username, r.media_id, \
     m.title AS media_title, m.kind AS media_kind, r.score, r.text, \
     r.created_at, r.updated_at \
     FROM reviews r \
     JOIN users u ON u.id = r.user_id \
     JOIN media m ON m.id = r.media_id";

/// PostgreSQL-backed implementation of the `ReviewsRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresReviewsRepository {
    pool: PgPool,
}

impl PostgresReviewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ReviewsRepository for PostgresReviewsRepository {
    async fn insert(&self, review: &NewReview) -> Result<Review> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO reviews (user_id, media_id, score, text) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(review.user_id.get())
        .bind(review.media_id.get())
        .bind(review.score)
        .bind(&review.text)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("reviews_user_media_key") => CatalogError::AlreadyReviewed {
                user: review.user_id,
                media: review.media_id,
            },
            Some("reviews_user_id_fkey") => {
                CatalogError::not_found(Aggregate::User, review.user_id)
            }
            Some("reviews_media_id_fkey") => {
                CatalogError::not_found(Aggregate::Media, review.media_id)
            }
            _ if is_foreign_key_violation(&e) => {
                CatalogError::not_found(Aggregate::Media, review.media_id)
            }
            _ => db_err("Failed to insert review")(e),
        })?;

        info!(
            target: "critica::reviews",
            review_id = id,
            user_id = %review.user_id,
            media_id = %review.media_id,
            "created review"
        );

        self.get(ReviewId(id))
            .await?
            .ok_or_else(|| CatalogError::Storage(format!("review {id} vanished after insert")))
    }

    async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
            .bind(id.get())
            .fetch_optional(self.pool())
            .await
            .map_err(db_err("Failed to get review by id"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn search(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>> {
        let mut qb = QueryBuilder::<Postgres>::new(REVIEW_SELECT);
        qb.push(" WHERE TRUE");
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reviews r WHERE TRUE");
        for criterion in filter.criteria() {
            criterion.push_sql(&mut qb);
            criterion.push_sql(&mut count_qb);
        }
        qb.push(" ORDER BY r.id");
        push_page(&mut qb, page);

        let rows = qb
            .build_query_as::<ReviewRow>()
            .fetch_all(self.pool())
            .await
            .map_err(db_err("Failed to search reviews"))?;
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(db_err("Failed to count reviews"))?;

        let content = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>>>()?;
        Ok(page_of(content, page, total))
    }

    async fn exists_by(&self, user: UserId, media: MediaId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE user_id = $1 AND media_id = $2)",
        )
        .bind(user.get())
        .bind(media.get())
        .fetch_one(self.pool())
        .await
        .map_err(db_err("Failed to check review existence"))
    }

    async fn update(&self, id: ReviewId, patch: &ReviewPatch) -> Result<Option<Review>> {
        let result = sqlx::query(
            "UPDATE reviews SET \
                 score = COALESCE($2, score), \
                 text = COALESCE($3, text), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id.get())
        .bind(patch.score)
        .bind(&patch.text)
        .execute(self.pool())
        .await
        .map_err(db_err("Failed to update review"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!(target: "critica::reviews", review_id = %id, "updated review");
        self.get(id).await
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(db_err("Failed to delete review"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::reviews", review_id = %id, "deleted review");
        }
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    user_id: i64,
    username: String,
    media_id: i64,
    media_title: String,
    media_kind: String,
    score: i16,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = CatalogError;

    fn try_from(row: ReviewRow) -> Result<Self> {
        Ok(Review {
            id: ReviewId(row.id),
            user_id: UserId(row.user_id),
            username: row.username,
            media_id: MediaId(row.media_id),
            media_title: row.media_title,
            media_kind: row.media_kind.parse()?,
            score: row.score,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
