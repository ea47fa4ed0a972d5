//! Request extractors that fail with [`AppError`] so every rejection is
//! rendered in the error envelope.

use std::fmt;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use critica_core::{
    api_types::Validate,
    messages::{ErrorCode, FieldViolation},
};
use critica_model::PageRequest;
use serde::de::DeserializeOwned;

use crate::infra::{app_state::AppState, config::PaginationConfig, errors::AppError};

/// JSON body checked with [`Validate`]; yields the validated domain payload.
pub struct ValidatedJson<T: Validate>(pub T::Output);

impl<T> fmt::Debug for ValidatedJson<T>
where
    T: Validate,
    T::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedJson").field(&self.0).finish()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
    T::Output: Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::malformed_body(rejection.body_text()))?;

        payload.validate().map(Self).map_err(AppError::validation)
    }
}

/// Path parameters; unparsable ids are a 400.
#[derive(Debug)]
pub struct PathId<T>(pub T);

impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Raw query pairs in the order given.
#[derive(Debug, Default)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(pairs))
    }
}

/// `page` and `size` query parameters resolved against the configured limits.
#[derive(Debug, Clone, Copy)]
pub struct Paging(pub PageRequest);

impl FromRequestParts<AppState> for Paging {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let QueryPairs(pairs) = QueryPairs::from_request_parts(parts, state).await?;
        page_request(&pairs, state.config.pagination)
            .map(Self)
            .map_err(AppError::validation)
    }
}

/// Missing values take the defaults; a size above the maximum is capped.
pub fn page_request(
    pairs: &[(String, String)],
    limits: PaginationConfig,
) -> Result<PageRequest, Vec<FieldViolation>> {
    let mut request = limits.default_request();
    let mut violations = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => match value.trim().parse::<u32>() {
                Ok(page) => request.page = page,
                Err(_) => violations.push(FieldViolation::new(
                    "page",
                    ErrorCode::InvalidPageNumber,
                    &[("value", value)],
                )),
            },
            "size" => match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => request.size = size.min(limits.max_size),
                _ => violations.push(FieldViolation::new(
                    "size",
                    ErrorCode::InvalidPageSize,
                    &[("max", &limits.max_size)],
                )),
            },
            _ => {}
        }
    }

    if violations.is_empty() {
        Ok(request)
    } else {
        Err(violations)
    }
}
