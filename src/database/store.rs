use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Resource;
use crate::types::{CreateInput, Page, UpdateInput};

/// Errors surfaced by any resource store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{label} with {field} '{value}' already exists")]
    DuplicateValue {
        label: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{label} '{id}' not found")]
    NotFound { label: &'static str, id: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn duplicate_name<E: Resource>(name: &str) -> Self {
        StoreError::DuplicateValue {
            label: E::LABEL,
            field: "name",
            value: name.to_string(),
        }
    }

    pub fn not_found<E: Resource>(id: &str) -> Self {
        StoreError::NotFound {
            label: E::LABEL,
            id: id.to_string(),
        }
    }
}

/// One page of records plus the total number of records of the kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<E> {
    pub items: Vec<E>,
    pub total: u64,
}

/// Authoritative holder of records of one kind.
///
/// Implementations enforce name uniqueness atomically: of two concurrent
/// writes claiming the same name, exactly one succeeds.
#[async_trait]
pub trait ResourceStore<E: Resource>: Send + Sync {
    async fn insert(&self, input: CreateInput) -> Result<E, StoreError>;

    async fn find(&self, id: &str) -> Result<E, StoreError>;

    async fn patch(&self, id: &str, input: UpdateInput) -> Result<E, StoreError>;

    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Records in creation order, sliced by `page`
    async fn page(&self, page: Page) -> Result<PageSlice<E>, StoreError>;

    /// Backend reachability, used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Fresh opaque identifier; never reused within a process or across restarts
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::OrganizationScope;

    #[test]
    fn generated_ids_are_unique_lowercase_hex() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn error_messages_name_the_kind() {
        let err = StoreError::duplicate_name::<OrganizationScope>("read:members");
        assert_eq!(
            err.to_string(),
            "organization scope with name 'read:members' already exists"
        );
        let err = StoreError::not_found::<OrganizationScope>("0");
        assert_eq!(err.to_string(), "organization scope '0' not found");
    }
}
