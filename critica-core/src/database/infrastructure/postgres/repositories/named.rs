//! Shared queries for tables that hold only a unique, lowercase name.

use critica_model::{Page, PageRequest, normalize_name};
use sqlx::PgPool;
use tracing::info;

use super::common::{db_err, limit_offset, page_of, violated_constraint};
use crate::error::{Aggregate, CatalogError, Result};

#[derive(sqlx::FromRow)]
pub(super) struct NamedRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct NamedTable {
    pub aggregate: Aggregate,
    pub insert: &'static str,
    pub by_id: &'static str,
    pub by_name: &'static str,
    pub list: &'static str,
    pub count: &'static str,
    pub delete: &'static str,
    pub unique_index: &'static str,
}

impl NamedTable {
    pub async fn insert(&self, pool: &PgPool, raw_name: &str) -> Result<NamedRow> {
        let name = normalize_name(raw_name);
        let row = sqlx::query_as::<_, NamedRow>(self.insert)
            .bind(&name)
            .fetch_one(pool)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some(index) if index == self.unique_index => {
                    CatalogError::already_exists(self.aggregate, name.clone())
                }
                _ => db_err("Failed to insert named row")(e),
            })?;

        info!(target: "critica::catalog", id = row.id, "created {} {}", self.aggregate, row.name);
        Ok(row)
    }

    pub async fn get(&self, pool: &PgPool, id: i64) -> Result<Option<NamedRow>> {
        sqlx::query_as::<_, NamedRow>(self.by_id)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_err("Failed to get named row by id"))
    }

    pub async fn find_by_name(&self, pool: &PgPool, name: &str) -> Result<Option<NamedRow>> {
        sqlx::query_as::<_, NamedRow>(self.by_name)
            .bind(normalize_name(name))
            .fetch_optional(pool)
            .await
            .map_err(db_err("Failed to get named row by name"))
    }

    pub async fn list(&self, pool: &PgPool, page: PageRequest) -> Result<Page<NamedRow>> {
        let (limit, offset) = limit_offset(page);
        let rows = sqlx::query_as::<_, NamedRow>(self.list)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(db_err("Failed to list named rows"))?;

        let total: i64 = sqlx::query_scalar(self.count)
            .fetch_one(pool)
            .await
            .map_err(db_err("Failed to count named rows"))?;

        Ok(page_of(rows, page, total))
    }

    /// Link rows go through `ON DELETE CASCADE`.
    pub async fn delete(&self, pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query(self.delete)
            .bind(id)
            .execute(pool)
            .await
            .map_err(db_err("Failed to delete named row"))?;

        if result.rows_affected() > 0 {
            info!(target: "critica::catalog", id, "deleted {}", self.aggregate);
        }
        Ok(result.rows_affected() > 0)
    }
}
