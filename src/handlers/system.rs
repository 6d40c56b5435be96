use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::{OrganizationRole, OrganizationScope, Resource};
use crate::database::store::ResourceStore;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Organization Resource API",
        "version": version,
        "endpoints": {
            "health": "/health",
            "scopes": format!("/{}[/:id]", OrganizationScope::PATH),
            "roles": format!("/{}[/:id]", OrganizationRole::PATH),
        }
    }))
}

pub async fn health(
    State(store): State<Arc<dyn ResourceStore<OrganizationScope>>>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
