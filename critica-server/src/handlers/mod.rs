//! HTTP handlers, one module per aggregate.
//!
//! Handlers stay thin: extract, call the matching service, convert the
//! entity to its DTO and wrap it in [`ApiResponse`].

pub mod catalog;
pub mod crew;
pub mod games;
pub mod health;
pub mod likes;
pub mod media;
pub mod movies;
pub mod reviews;
pub mod users;

use axum::{Json, http::StatusCode};
use critica_core::{
    api_types::ApiResponse,
    query::{Filter, FilterBuilder, SearchKey},
};
use tracing::warn;

use crate::infra::{app_state::AppState, errors::AppResult};

pub(crate) type Created<T> = (StatusCode, Json<ApiResponse<T>>);

pub(crate) fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub(crate) fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Build a search filter from query pairs, honoring the strict-keys setting.
pub(crate) fn search_filter<K: SearchKey>(
    state: &AppState,
    pairs: Vec<(String, String)>,
    target: &'static str,
) -> AppResult<Filter<K::Criterion>> {
    let filter = FilterBuilder::<K>::new()
        .strict(state.config.filters.strict_keys)
        .extend(pairs)
        .build()?;

    if !filter.ignored_keys().is_empty() {
        warn!(
            target: "critica::search",
            aggregate = target,
            keys = ?filter.ignored_keys(),
            "ignoring unknown search keys"
        );
    }
    Ok(filter)
}
