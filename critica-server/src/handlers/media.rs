use axum::{Json, extract::State};
use critica_core::{
    api_types::{ApiResponse, MediaDto},
    conversion::ToDto,
};
use critica_model::MediaId;

use super::ok;
use crate::infra::{app_state::AppState, errors::AppResult, extract::PathId};

/// Resolve an id without knowing whether it names a game or a movie.
pub async fn get_media(
    State(state): State<AppState>,
    PathId(id): PathId<MediaId>,
) -> AppResult<Json<ApiResponse<MediaDto>>> {
    let media = state.services().media().get(id).await?;
    Ok(ok(media.to_dto()))
}
