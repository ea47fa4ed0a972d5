use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{ApiResponse, CreateGameRequest, MediaDto},
    conversion::{ToDto, convert_page},
    query::GameKey,
};
use critica_model::{MediaId, Page};

use super::{Created, created, ok, search_filter};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, QueryPairs, ValidatedJson},
};

pub async fn list_games(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<MediaDto>>>> {
    let games = state.services().games().list(page).await?;
    Ok(ok(convert_page(games)))
}

/// `GET /game/search?title=..&developer=..&platform=..&genre=..`
pub async fn search_games(
    State(state): State<AppState>,
    Paging(page): Paging,
    QueryPairs(pairs): QueryPairs,
) -> AppResult<Json<ApiResponse<Page<MediaDto>>>> {
    let filter = search_filter::<GameKey>(&state, pairs, "game")?;
    let games = state.services().games().search(&filter, page).await?;
    Ok(ok(convert_page(games)))
}

pub async fn create_game(
    State(state): State<AppState>,
    ValidatedJson(game): ValidatedJson<CreateGameRequest>,
) -> AppResult<Created<MediaDto>> {
    let game = state.services().games().create(game).await?;
    Ok(created(game.to_dto()))
}

pub async fn get_game(
    State(state): State<AppState>,
    PathId(id): PathId<MediaId>,
) -> AppResult<Json<ApiResponse<MediaDto>>> {
    let game = state.services().games().get(id).await?;
    Ok(ok(game.to_dto()))
}

pub async fn delete_game(
    State(state): State<AppState>,
    PathId(id): PathId<MediaId>,
) -> AppResult<StatusCode> {
    state.services().games().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
