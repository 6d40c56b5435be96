//! Shared request/response types used by the store, the HTTP layer and the client

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub const MAX_NAME_LENGTH: usize = 128;
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

/// Body of a create request. `description` defaults to null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a partial update.
///
/// `description` is doubly optional: an omitted key leaves the stored value
/// alone while an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl CreateInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Field-level validation; returns field -> message on failure
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        check_name(&self.name, &mut errors);
        check_description(self.description.as_deref(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateInput {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(description) = &self.description {
            check_description(description.as_deref(), &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merge into the current field values, producing the new (name, description)
    pub fn apply(&self, name: &str, description: Option<&str>) -> (String, Option<String>) {
        let name = self.name.clone().unwrap_or_else(|| name.to_string());
        let description = match &self.description {
            Some(next) => next.clone(),
            None => description.map(str::to_string),
        };
        (name, description)
    }
}

fn check_name(name: &str, errors: &mut HashMap<String, String>) {
    if name.is_empty() {
        errors.insert("name".to_string(), "This field is required".to_string());
    } else if name.chars().any(char::is_control) {
        errors.insert(
            "name".to_string(),
            "Must not contain control characters".to_string(),
        );
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.insert(
            "name".to_string(),
            format!("Must be at most {} characters", MAX_NAME_LENGTH),
        );
    }
}

fn check_description(description: Option<&str>, errors: &mut HashMap<String, String>) {
    if let Some(description) = description {
        // Postgres text cannot hold NUL
        if description.contains('\0') {
            errors.insert(
                "description".to_string(),
                "Must not contain NUL characters".to_string(),
            );
        } else if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.insert(
                "description".to_string(),
                format!("Must be at most {} characters", MAX_DESCRIPTION_LENGTH),
            );
        }
    }
}

/// A 1-indexed page request over creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// Query parameters accepted by list endpoints (and sent by the client)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ListQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}
