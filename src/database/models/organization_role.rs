use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Resource;

/// A named bundle of organization scopes that members can be granted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrganizationRole {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Resource for OrganizationRole {
    const TABLE: &'static str = "organization_roles";
    const PATH: &'static str = "organization-roles";
    const LABEL: &'static str = "organization role";

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
