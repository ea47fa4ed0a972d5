use axum::{Json, extract::State, http::StatusCode};
use critica_core::{
    api_types::{
        ApiResponse, CreateReviewRequest, PatchReviewRequest, ReplaceReviewRequest, ReviewDto,
    },
    conversion::{ToDto, convert_page},
    query::ReviewKey,
};
use critica_model::{Page, ReviewId};

use super::{Created, created, ok, search_filter};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{Paging, PathId, QueryPairs, ValidatedJson},
};

pub async fn list_reviews(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> AppResult<Json<ApiResponse<Page<ReviewDto>>>> {
    let reviews = state.services().reviews().list(page).await?;
    Ok(ok(convert_page(reviews)))
}

/// `GET /review/search?userId=..&mediaId=..`
pub async fn search_reviews(
    State(state): State<AppState>,
    Paging(page): Paging,
    QueryPairs(pairs): QueryPairs,
) -> AppResult<Json<ApiResponse<Page<ReviewDto>>>> {
    let filter = search_filter::<ReviewKey>(&state, pairs, "review")?;
    let reviews = state.services().reviews().search(&filter, page).await?;
    Ok(ok(convert_page(reviews)))
}

pub async fn create_review(
    State(state): State<AppState>,
    ValidatedJson(review): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<ReviewDto>> {
    let review = state.services().reviews().create(review).await?;
    Ok(created(review.to_dto()))
}

pub async fn get_review(
    State(state): State<AppState>,
    PathId(id): PathId<ReviewId>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    let review = state.services().reviews().get(id).await?;
    Ok(ok(review.to_dto()))
}

/// PUT: score and text are both replaced.
pub async fn replace_review(
    State(state): State<AppState>,
    PathId(id): PathId<ReviewId>,
    ValidatedJson(patch): ValidatedJson<ReplaceReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    let review = state.services().reviews().update(id, patch).await?;
    Ok(ok(review.to_dto()))
}

/// PATCH: absent fields keep their stored value.
pub async fn patch_review(
    State(state): State<AppState>,
    PathId(id): PathId<ReviewId>,
    ValidatedJson(patch): ValidatedJson<PatchReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    let review = state.services().reviews().update(id, patch).await?;
    Ok(ok(review.to_dto()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    PathId(id): PathId<ReviewId>,
) -> AppResult<StatusCode> {
    state.services().reviews().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
