use axum::{
    extract::DefaultBodyLimit,
    http::{header::HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::alteration::Alterator;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{
    DatabaseManager, MemoryStore, OrganizationRole, OrganizationScope, Repository, ResourceStore,
};
use crate::handlers::{self, crud_routes, PageLimits, ResourceState};
use crate::middleware::TOTAL_NUMBER_HEADER;

/// One store per resource kind, shared by every request
#[derive(Clone)]
pub struct Stores {
    pub scopes: Arc<dyn ResourceStore<OrganizationScope>>,
    pub roles: Arc<dyn ResourceStore<OrganizationRole>>,
}

impl Stores {
    pub fn memory() -> Self {
        Self {
            scopes: Arc::new(MemoryStore::<OrganizationScope>::new()),
            roles: Arc::new(MemoryStore::<OrganizationRole>::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            scopes: Arc::new(Repository::<OrganizationScope>::new(pool.clone())),
            roles: Arc::new(Repository::<OrganizationRole>::new(pool)),
        }
    }

    /// Build stores for the configured backend. Postgres gets its baseline schema first.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.store_backend() {
            StoreBackend::Memory => {
                warn!("Using in-memory store; records are lost on restart");
                Ok(Self::memory())
            }
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                Alterator::new(pool.clone()).ensure_baseline().await?;
                Ok(Self::postgres(pool))
            }
        }
    }
}

/// Routes for every resource kind plus the service endpoints
pub fn app(stores: Stores, limits: PageLimits) -> Router {
    let system = Router::new()
        .route("/health", get(handlers::system::health))
        .with_state(stores.scopes.clone());

    Router::new()
        .route("/", get(handlers::system::root))
        .merge(system)
        .merge(crud_routes(ResourceState {
            store: stores.scopes,
            limits,
        }))
        .merge(crud_routes(ResourceState {
            store: stores.roles,
            limits,
        }))
        .layer(TraceLayer::new_for_http())
}

/// `app` with the configured body limit and CORS policy applied
pub fn app_from_config(stores: Stores, config: &AppConfig) -> Router {
    let limits = PageLimits::clamped(config.api.default_page_size, config.api.max_page_size);
    if limits.default_size != config.api.default_page_size || limits.max_size != config.api.max_page_size {
        warn!(
            "Page size bounds adjusted to default={} max={}",
            limits.default_size, limits.max_size
        );
    }

    let mut router = app(stores, limits).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(TOTAL_NUMBER_HEADER)])
}

/// Serve until the listener fails or ctrl-c is received
pub async fn serve(listener: tokio::net::TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Organization resource API listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        app(Stores::memory(), PageLimits::default())
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_null_description() {
        let response = router()
            .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": "testAB12" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["name"], "testAB12");
        assert_eq!(body["description"], Value::Null);
        assert!(body.as_object().unwrap().contains_key("description"));
        assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn duplicate_name_returns_400_code() {
        let app = router();
        let create = || request("POST", "/organization-scopes", Some(json!({ "name": "dup" })));

        let first = app.clone().oneshot(create()).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.oneshot(create()).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(second).await["code"], "entity.duplicate_value_of_unique_field");
    }

    #[tokio::test]
    async fn lifecycle_update_then_delete() {
        let app = router();
        let created = json_body(
            app.clone()
                .oneshot(request("POST", "/organization-roles", Some(json!({ "name": "admin" }))))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();
        let item = format!("/organization-roles/{id}");

        let updated = app
            .clone()
            .oneshot(request(
                "PATCH",
                &item,
                Some(json!({ "name": "owner", "description": "x" })),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(
            json_body(updated).await,
            json!({ "id": id, "name": "owner", "description": "x" })
        );

        let deleted = app.clone().oneshot(request("DELETE", &item, None)).await.unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = app.clone().oneshot(request("GET", &item, None)).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing).await["code"], "entity.not_exists_with_id");

        let again = app.oneshot(request("DELETE", &item, None)).await.unwrap();
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn kinds_do_not_share_names() {
        let app = router();
        let scope = app
            .clone()
            .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": "same" }))))
            .await
            .unwrap();
        let role = app
            .oneshot(request("POST", "/organization-roles", Some(json!({ "name": "same" }))))
            .await
            .unwrap();
        assert_eq!(scope.status(), StatusCode::CREATED);
        assert_eq!(role.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn invalid_bodies_and_pagination_are_400() {
        let app = router();

        let empty_name = app
            .clone()
            .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": "" }))))
            .await
            .unwrap();
        assert_eq!(empty_name.status(), StatusCode::BAD_REQUEST);
        let body = json_body(empty_name).await;
        assert_eq!(body["code"], "guard.invalid_input");
        assert!(body["data"]["name"].is_string());

        let missing_name = app
            .clone()
            .oneshot(request("POST", "/organization-scopes", Some(json!({ "description": "d" }))))
            .await
            .unwrap();
        assert_eq!(missing_name.status(), StatusCode::BAD_REQUEST);

        let bad_page = app
            .oneshot(request("GET", "/organization-scopes?page=0", None))
            .await
            .unwrap();
        assert_eq!(bad_page.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(bad_page).await["code"], "guard.invalid_pagination");
    }

    #[tokio::test]
    async fn repeated_or_garbled_page_params_are_400() {
        let app = router();
        for i in 0..25 {
            app.clone()
                .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": format!("p{i}") }))))
                .await
                .unwrap();
        }

        for uri in [
            "/organization-scopes?page=2&page=3&page_size=abc&page_size=5",
            "/organization-scopes?page_size=5&page_size=5",
            "/organization-scopes?page_size=abc",
        ] {
            let response = app.clone().oneshot(request("GET", uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json_body(response).await["code"], "guard.invalid_pagination");
        }

        let plain = app
            .oneshot(request("GET", "/organization-scopes", None))
            .await
            .unwrap();
        assert_eq!(plain.status(), StatusCode::OK);
        assert_eq!(json_body(plain).await.as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn list_reports_total_number() {
        let app = router();
        for i in 0..3 {
            app.clone()
                .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": format!("s{i}") }))))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/organization-scopes?page=1&page_size=2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TOTAL_NUMBER_HEADER], "3");
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["name"], "s0");
    }

    #[tokio::test]
    async fn configured_default_page_size_is_clamped() {
        let mut config = AppConfig::development();
        config.security.enable_cors = false;
        config.api.default_page_size = 0;
        config.api.max_page_size = 5;
        let app = app_from_config(Stores::memory(), &config);
        for i in 0..3 {
            app.clone()
                .oneshot(request("POST", "/organization-scopes", Some(json!({ "name": format!("c{i}") }))))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(request("GET", "/organization-scopes", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        config.api.default_page_size = 50;
        let app = app_from_config(Stores::memory(), &config);
        let response = app
            .oneshot(request("GET", "/organization-scopes", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_ok_for_memory_store() {
        let response = router().oneshot(request("GET", "/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}
