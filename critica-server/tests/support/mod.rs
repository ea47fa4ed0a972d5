#![allow(dead_code)]

use anyhow::{Context, Result, anyhow};
use axum::http::StatusCode;
use axum_test::TestServer;
use critica_core::api::routes::utils as route_utils;
use critica_server::{AppState, create_app, infra::config::Config};
use serde_json::Value;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Server over a fresh in-memory catalog with default settings.
pub fn build_test_app() -> Result<TestApp> {
    build_test_app_with(Config::in_memory())
}

pub fn build_test_app_with(config: Config) -> Result<TestApp> {
    let state = AppState::in_memory(config);
    let server =
        TestServer::new(create_app(state.clone())).map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp { server, state })
}

pub fn item(route: &str, id: impl ToString) -> String {
    route_utils::replace_param(route, "{id}", id.to_string())
}

/// POST `body`, expect 201 and return the `data` object.
pub async fn create(server: &TestServer, route: &str, body: Value) -> Result<Value> {
    let response = server.post(route).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body.get("data")
        .cloned()
        .with_context(|| format!("missing data in response from {route}"))
}

pub fn id_of(data: &Value) -> i64 {
    data["id"].as_i64().expect("numeric id in response")
}
