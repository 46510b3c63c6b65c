//! Route modules, one per resource.

use recipe_core::model::{DEFAULT_PAGE_SIZE, PageRequest};
use serde::Deserialize;

use crate::error::ApiError;

pub mod health;
pub mod ingredients;
pub mod recipes;

/// `?page=&size=` query parameters of the list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageParams {
    /// Converts the parameters into a checked page request.
    ///
    /// # Errors
    ///
    /// Returns a malformed-argument error if the size is out of range.
    pub fn to_page(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(self.page, self.size)?)
    }
}
