use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Resource;

/// A named permission unit attached to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrganizationScope {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Resource for OrganizationScope {
    const TABLE: &'static str = "organization_scopes";
    const PATH: &'static str = "organization-scopes";
    const LABEL: &'static str = "organization scope";

    fn from_parts(id: String, name: String, description: Option<String>) -> Self {
        Self { id, name, description }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
