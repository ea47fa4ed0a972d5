//! Completes error bodies with the request that produced them.
//!
//! Handlers and extractors fail with [`AppError`], whose response carries the
//! error in its extensions. This layer re-renders that body with the request
//! method and path. Responses produced by the router itself (unsupported
//! method) are given the same envelope.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::infra::errors::AppError;

#[derive(Clone, Debug, Default)]
pub struct ErrorEnvelopeLayer;

impl ErrorEnvelopeLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ErrorEnvelopeLayer {
    type Service = ErrorEnvelopeMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorEnvelopeMiddleware { inner }
    }
}

#[derive(Clone, Debug)]
pub struct ErrorEnvelopeMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for ErrorEnvelopeMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        // Take the service that was driven to readiness, leave a fresh clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(req).await?;

            let error = match response.extensions_mut().remove::<AppError>() {
                Some(error) => error,
                None if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                    AppError::method_not_allowed(format!("Method {method} is not supported"))
                }
                None => return Ok(response),
            };

            let envelope = error.envelope(&method, &path);
            Ok((error.status, Json(envelope)).into_response())
        })
    }
}
