use serde::Deserialize;

use crate::error::ApiError;
use crate::types::Page;

/// Page size bounds applied to every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: Page::DEFAULT_SIZE,
            max_size: 100,
        }
    }
}

/// Raw list query. Kept as strings so malformed numbers get a pagination
/// error rather than a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageLimits {
    /// Bounds from configuration, forced into `1 <= default_size <= max_size`
    pub fn clamped(default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }

    pub fn resolve(&self, params: &PageParams) -> Result<Page, ApiError> {
        let page = match params.page.as_deref() {
            None => 1,
            Some(raw) => parse_positive("page", raw)?,
        };
        let page_size = match params.page_size.as_deref() {
            None => self.default_size,
            Some(raw) => parse_positive("page_size", raw)?,
        };
        if page_size > self.max_size {
            return Err(ApiError::invalid_pagination(format!(
                "page_size must be at most {}",
                self.max_size
            )));
        }
        Ok(Page::new(page, page_size))
    }
}

fn parse_positive(field: &str, raw: &str) -> Result<u32, ApiError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::invalid_pagination(format!(
            "{} must be a positive integer, got '{}'",
            field, raw
        ))),
    }
}
