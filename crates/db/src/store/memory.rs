use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::RwLock;
use sitescore_core::types::DbId;

use super::{StoreError, UserStore};
use crate::models::user::{CreateUser, UpdateUser, User};

/// [`UserStore`] held entirely in process memory.
///
/// Contents are lost on restart. Email uniqueness is checked under the same
/// write lock as the insert, so concurrent registrations cannot both succeed.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: DbId,
    users: BTreeMap<DbId, User>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

fn duplicate_email() -> StoreError {
    StoreError::Duplicate("Duplicate value violates unique constraint: uq_users_email".into())
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        if inner.email_taken(&input.email, None) {
            return Err(duplicate_email());
        }

        inner.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_id,
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().users.values().rev().cloned().collect())
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write();
        if let Some(email) = &input.email {
            if inner.email_taken(email, Some(id)) {
                return Err(duplicate_email());
            }
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = &input.email {
            user.email = email.clone();
        }
        if let Some(hash) = &input.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(first_name) = &input.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().users.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
