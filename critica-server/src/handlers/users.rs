use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use critica_core::{
    api_types::{ApiResponse, CreateUserRequest, UserDto},
    conversion::{ToDto, convert_page},
};
use critica_model::{Page, UserId};
use serde::Deserialize;

use super::{Created, created, ok};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    extract::{Paging, PathId, ValidatedJson},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_users(
    State(state): State<AppState>,
    Paging(page): Paging,
    query: Result<Query<ListUsersQuery>, axum::extract::rejection::QueryRejection>,
) -> AppResult<Json<ApiResponse<Page<UserDto>>>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let users = state
        .services()
        .users()
        .list(page, query.include_inactive)
        .await?;
    Ok(ok(convert_page(users)))
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(user): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserDto>> {
    let user = state.services().users().create(user).await?;
    Ok(created(user.to_dto()))
}

pub async fn get_user(
    State(state): State<AppState>,
    PathId(id): PathId<UserId>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let user = state.services().users().get(id).await?;
    Ok(ok(user.to_dto()))
}

/// Soft delete: the account is deactivated, its likes and reviews remain.
pub async fn deactivate_user(
    State(state): State<AppState>,
    PathId(id): PathId<UserId>,
) -> AppResult<StatusCode> {
    state.services().users().deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
