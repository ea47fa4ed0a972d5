use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{ApiResponse, CreateMovieCrewRequest, MovieCrewDto},
    conversion::{ToDto, convert_page},
};
use critica_model::{CrewId, Page};

use super::{Created, created, ok};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, ValidatedJson},
};

pub async fn list_crew(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<MovieCrewDto>>>> {
    let crew = state.services().crew().list(page).await?;
    Ok(ok(convert_page(crew)))
}

pub async fn create_crew(
    State(state): State<AppState>,
    ValidatedJson(crew): ValidatedJson<CreateMovieCrewRequest>,
) -> AppResult<Created<MovieCrewDto>> {
    let crew = state.services().crew().create(crew).await?;
    Ok(created(crew.to_dto()))
}

pub async fn get_crew(
    State(state): State<AppState>,
    PathId(id): PathId<CrewId>,
) -> AppResult<Json<ApiResponse<MovieCrewDto>>> {
    let crew = state.services().crew().get(id).await?;
    Ok(ok(crew.to_dto()))
}

/// Removes the person and every role they hold.
pub async fn delete_crew(
    State(state): State<AppState>,
    PathId(id): PathId<CrewId>,
) -> AppResult<StatusCode> {
    state.services().crew().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
