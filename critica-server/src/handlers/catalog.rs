//! Developers, platforms and game genres.

use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{
        ApiResponse, CreateDeveloperRequest, CreateNamedRequest, DeveloperDto, GenreDto,
        PlatformDto,
    },
    conversion::{ToDto, convert_page},
};
use critica_model::{DeveloperId, GenreId, Page, PlatformId};

use super::{Created, created, ok};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, ValidatedJson},
};

pub async fn list_developers(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<DeveloperDto>>>> {
    let developers = state.services().developers().list(page).await?;
    Ok(ok(convert_page(developers)))
}

pub async fn create_developer(
    State(state): State<AppState>,
    ValidatedJson(developer): ValidatedJson<CreateDeveloperRequest>,
) -> AppResult<Created<DeveloperDto>> {
    let developer = state.services().developers().create(developer).await?;
    Ok(created(developer.to_dto()))
}

pub async fn get_developer(
    State(state): State<AppState>,
    PathId(id): PathId<DeveloperId>,
) -> AppResult<Json<ApiResponse<DeveloperDto>>> {
    let developer = state.services().developers().get(id).await?;
    Ok(ok(developer.to_dto()))
}

pub async fn delete_developer(
    State(state): State<AppState>,
    PathId(id): PathId<DeveloperId>,
) -> AppResult<StatusCode> {
    state.services().developers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_platforms(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<PlatformDto>>>> {
    let platforms = state.services().platforms().list(page).await?;
    Ok(ok(convert_page(platforms)))
}

pub async fn create_platform(
    State(state): State<AppState>,
    ValidatedJson(platform): ValidatedJson<CreateNamedRequest>,
) -> AppResult<Created<PlatformDto>> {
    let platform = state.services().platforms().create(platform).await?;
    Ok(created(platform.to_dto()))
}

pub async fn get_platform(
    State(state): State<AppState>,
    PathId(id): PathId<PlatformId>,
) -> AppResult<Json<ApiResponse<PlatformDto>>> {
    let platform = state.services().platforms().get(id).await?;
    Ok(ok(platform.to_dto()))
}

pub async fn delete_platform(
    State(state): State<AppState>,
    PathId(id): PathId<PlatformId>,
) -> AppResult<StatusCode> {
    state.services().platforms().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_genres(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<GenreDto>>>> {
    let genres = state.services().genres().list(page).await?;
    Ok(ok(convert_page(genres)))
}

pub async fn create_genre(
    State(state): State<AppState>,
    ValidatedJson(genre): ValidatedJson<CreateNamedRequest>,
) -> AppResult<Created<GenreDto>> {
    let genre = state.services().genres().create(genre).await?;
    Ok(created(genre.to_dto()))
}

pub async fn get_genre(
    State(state): State<AppState>,
    PathId(id): PathId<GenreId>,
) -> AppResult<Json<ApiResponse<GenreDto>>> {
    let genre = state.services().genres().get(id).await?;
    Ok(ok(genre.to_dto()))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    PathId(id): PathId<GenreId>,
) -> AppResult<StatusCode> {
    state.services().genres().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
