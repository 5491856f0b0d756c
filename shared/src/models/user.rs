//! User reference model

use serde::{Deserialize, Serialize};

/// Weak reference to a user owned by the external user store
///
/// Orders only carry the id plus a denormalized display name; the full
/// account record never enters this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: u64,
    pub display_name: String,
}
