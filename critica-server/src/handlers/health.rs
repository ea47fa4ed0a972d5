use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

/// Liveness probe. Pings the database when one is configured.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.config.storage.as_str(),
        "checks": {}
    });

    let Some(postgres) = state.postgres.as_ref() else {
        return (StatusCode::OK, Json(health_status));
    };

    match postgres.ping().await {
        Ok(()) => {
            let stats = postgres.pool_stats();
            health_status["checks"]["database"] = json!({
                "status": "healthy",
                "pool_size": stats.size,
                "idle": stats.idle,
                "max_size": stats.max_size,
            });
            (StatusCode::OK, Json(health_status))
        }
        Err(err) => {
            warn!(error = %err, "health check could not reach the database");
            health_status["status"] = json!("unhealthy");
            health_status["checks"]["database"] = json!({ "status": "unhealthy" });
            (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
        }
    }
}
