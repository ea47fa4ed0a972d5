//! HTTP surface of the Critica catalog: configuration, application state,
//! the `/api/v1` router and its handlers.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
