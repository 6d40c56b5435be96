pub mod organization_role;
pub mod organization_scope;

pub use organization_role::OrganizationRole;
pub use organization_scope::OrganizationScope;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

/// A named resource kind served by the generic CRUD stack.
///
/// Every kind shares the `{id, name, description}` column set; `name` is unique
/// within the kind. Implementors pick the table, the URL segment and how the
/// shared fields map onto their own struct.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, PgRow>
{
    /// Postgres table holding this kind
    const TABLE: &'static str;
    /// Collection path segment, e.g. `organization-scopes`
    const PATH: &'static str;
    /// Human label used in messages and logs
    const LABEL: &'static str;

    fn from_parts(id: String, name: String, description: Option<String>) -> Self;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
}
