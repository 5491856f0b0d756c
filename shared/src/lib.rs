//! Shared types for the Storefront order subsystem
//!
//! Common types used across crates: error taxonomy, the uniform API
//! response envelope, domain models, and request/transfer shapes.

pub mod dto;
pub mod error;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use response::{ApiResponse, Paginated, Pagination};
