// handlers/mod.rs - HTTP surface
//
// One generic CRUD handler set (resource.rs) is mounted once per resource
// kind; system.rs holds the service-level endpoints.

pub mod pagination;
pub mod resource;
pub mod system;

use axum::{routing::get, Router};

use crate::database::models::Resource;

pub use pagination::{PageLimits, PageParams};
pub use resource::ResourceState;

/// Collection and item routes for one resource kind:
///
/// - `GET|POST /{kind}`
/// - `GET|PATCH|DELETE /{kind}/:id`
pub fn crud_routes<E: Resource>(state: ResourceState<E>) -> Router {
    let collection = format!("/{}", E::PATH);
    let item = format!("/{}/:id", E::PATH);

    Router::new()
        .route(
            &collection,
            get(resource::list::<E>).post(resource::create::<E>),
        )
        .route(
            &item,
            get(resource::show::<E>)
                .patch(resource::update::<E>)
                .delete(resource::delete::<E>),
        )
        .with_state(state)
}
