use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{ApiResponse, CreateLikeRequest, LikeDto},
    conversion::{ToDto, convert_page},
};
use critica_model::{LikeId, MediaId, Page, UserId};

use super::{Created, created, ok};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, ValidatedJson},
};

pub async fn list_likes(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<LikeDto>>>> {
    let likes = state.services().likes().list(page).await?;
    Ok(ok(convert_page(likes)))
}

pub async fn create_like(
    State(state): State<AppState>,
    ValidatedJson(like): ValidatedJson<CreateLikeRequest>,
) -> AppResult<Created<LikeDto>> {
    let like = state.services().likes().create(like).await?;
    Ok(created(like.to_dto()))
}

pub async fn get_like(
    State(state): State<AppState>,
    PathId(id): PathId<LikeId>,
) -> AppResult<Json<ApiResponse<LikeDto>>> {
    let like = state.services().likes().get(id).await?;
    Ok(ok(like.to_dto()))
}

pub async fn likes_by_media(
    State(state): State<AppState>,
    PathId(media_id): PathId<MediaId>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<LikeDto>>>> {
    let likes = state.services().likes().list_by_media(media_id, page).await?;
    Ok(ok(convert_page(likes)))
}

pub async fn likes_by_user(
    State(state): State<AppState>,
    PathId(user_id): PathId<UserId>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<LikeDto>>>> {
    let likes = state.services().likes().list_by_user(user_id, page).await?;
    Ok(ok(convert_page(likes)))
}

pub async fn delete_like(
    State(state): State<AppState>,
    PathId(id): PathId<LikeId>,
) -> AppResult<StatusCode> {
    state.services().likes().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
