//! API Response types
//!
//! Uniform response envelope for the service surface
//!
//! All service calls resolve to this shape:
//! ```json
//! {
//!     "success": true,
//!     "message": "Success",
//!     "data": { ... },
//!     "status": 200
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Uniform service response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response payload (omitted on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Numeric status code (200 / 400 / 404 / 409 / 500)
    pub status: u16,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            data: Some(data),
            status: 200,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: 200,
        }
    }

    /// Create a failure response
    pub fn fail(message: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status,
        }
    }
}

impl<T> From<ApiError> for ApiResponse<T> {
    fn from(err: ApiError) -> Self {
        let code = err.error_code();
        Self::fail(err.message(), code.status_code().as_u16())
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            ((total as f64) / (per_page as f64)).ceil() as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// List of items
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, per_page, total),
        }
    }
}
