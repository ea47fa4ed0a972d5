use critica_model::{Page, PageRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::error::CatalogError;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps an unexpected driver error to `Storage`, logging the detail.
pub(super) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
    move |err| {
        error!(target: "critica::db", error = %err, "{context}");
        CatalogError::storage(context, err)
    }
}

/// Name of the violated constraint (or unique index), if any.
pub(super) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error().and_then(|db| db.constraint())
}

pub(super) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

pub(super) fn limit_offset(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit()).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

pub(super) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    let (limit, offset) = limit_offset(page);
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
}

pub(super) async fn count(
    pool: &PgPool,
    sql: &'static str,
    context: &'static str,
) -> Result<i64, CatalogError> {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .map_err(db_err(context))
}

pub(super) fn page_of<T>(content: Vec<T>, page: PageRequest, total: i64) -> Page<T> {
    Page::new(content, page, u64::try_from(total).unwrap_or_default())
}
