use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{ApiResponse, AssignCrewRoleRequest, CreateMovieRequest, CrewRoleDto, MediaDto},
    conversion::{ToDto, convert_page},
    query::MovieKey,
};
use critica_model::{CrewId, MediaId, Page};

use super::{Created, created, ok, search_filter};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, QueryPairs, ValidatedJson},
};

pub async fn list_movies(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<MediaDto>>>> {
    let movies = state.services().movies().list(page).await?;
    Ok(ok(convert_page(movies)))
}

/// `GET /movie/search?title=..&crewId=..`
pub async fn search_movies(
    State(state): State<AppState>,
    Paging(page): Paging,
    QueryPairs(pairs): QueryPairs,
) -> AppResult<Json<ApiResponse<Page<MediaDto>>>> {
    let filter = search_filter::<MovieKey>(&state, pairs, "movie")?;
    let movies = state.services().movies().search(&filter, page).await?;
    Ok(ok(convert_page(movies)))
}

pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(movie): ValidatedJson<CreateMovieRequest>,
) -> AppResult<Created<MediaDto>> {
    let movie = state.services().movies().create(movie).await?;
    Ok(created(movie.to_dto()))
}

pub async fn get_movie(
    State(state): State<AppState>,
    PathId(id): PathId<MediaId>,
) -> AppResult<Json<ApiResponse<MediaDto>>> {
    let movie = state.services().movies().get(id).await?;
    Ok(ok(movie.to_dto()))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    PathId(id): PathId<MediaId>,
) -> AppResult<StatusCode> {
    state.services().movies().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_crew_role(
    State(state): State<AppState>,
    PathId(movie_id): PathId<MediaId>,
    ValidatedJson(assignment): ValidatedJson<AssignCrewRoleRequest>,
) -> AppResult<Created<CrewRoleDto>> {
    let role = state.services().crew().assign(movie_id, assignment).await?;
    Ok(created(role.to_dto()))
}

pub async fn remove_crew_role(
    State(state): State<AppState>,
    PathId((movie_id, crew_id)): PathId<(MediaId, CrewId)>,
) -> AppResult<StatusCode> {
    state.services().crew().unassign(movie_id, crew_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
