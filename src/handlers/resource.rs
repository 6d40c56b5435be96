// Generic CRUD handlers, instantiated once per resource kind

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use std::sync::Arc;

use crate::database::models::Resource;
use crate::database::store::ResourceStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{CreateInput, UpdateInput};

use super::pagination::{PageLimits, PageParams};

/// Router state for one resource kind
pub struct ResourceState<E> {
    pub store: Arc<dyn ResourceStore<E>>,
    pub limits: PageLimits,
}

impl<E> Clone for ResourceState<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            limits: self.limits,
        }
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_input(rejection.body_text(), None))
}

/// POST /{kind}
pub async fn create<E: Resource>(
    State(state): State<ResourceState<E>>,
    payload: Result<Json<CreateInput>, JsonRejection>,
) -> ApiResult<E> {
    let input = body(payload)?;
    input
        .validate()
        .map_err(|fields| ApiError::invalid_input("Invalid request body", Some(fields)))?;

    let record = state.store.insert(input).await?;
    tracing::info!(id = record.id(), name = record.name(), "created {}", E::LABEL);
    Ok(ApiResponse::created(record))
}

/// GET /{kind}?page=&page_size=
pub async fn list<E: Resource>(
    State(state): State<ResourceState<E>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Vec<E>> {
    let Query(params) =
        params.map_err(|rejection| ApiError::invalid_pagination(rejection.body_text()))?;
    let page = state.limits.resolve(&params)?;
    let slice = state.store.page(page).await?;
    Ok(ApiResponse::paginated(slice.items, slice.total))
}

/// GET /{kind}/:id
pub async fn show<E: Resource>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> ApiResult<E> {
    let record = state.store.find(&id).await?;
    Ok(ApiResponse::success(record))
}

/// PATCH /{kind}/:id
pub async fn update<E: Resource>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateInput>, JsonRejection>,
) -> ApiResult<E> {
    let input = body(payload)?;
    input
        .validate()
        .map_err(|fields| ApiError::invalid_input("Invalid request body", Some(fields)))?;

    let record = state.store.patch(&id, input).await?;
    tracing::info!(id = record.id(), name = record.name(), "updated {}", E::LABEL);
    Ok(ApiResponse::success(record))
}

/// DELETE /{kind}/:id
pub async fn delete<E: Resource>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.store.remove(&id).await?;
    tracing::info!(id = %id, "deleted {}", E::LABEL);
    Ok(ApiResponse::<()>::no_content())
}
