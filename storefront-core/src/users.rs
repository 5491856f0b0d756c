//! User directory seam
//!
//! Orders validate the owning user against the external user store. Only
//! existence and a display name are consumed here; registration, auth and
//! profile management live in another service.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::UserRef;

/// Narrow view of the external user store
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, id: u64) -> bool;
    async fn get(&self, id: u64) -> Option<UserRef>;
}

/// In-memory directory (tests, fixtures, embedded deployments)
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<u64, UserRef>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRef) {
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn exists(&self, id: u64) -> bool {
        self.users.contains_key(&id)
    }

    async fn get(&self, id: u64) -> Option<UserRef> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }
}
