pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::{OrganizationRole, OrganizationScope, Resource};
pub use repository::Repository;
pub use store::{PageSlice, ResourceStore, StoreError};
