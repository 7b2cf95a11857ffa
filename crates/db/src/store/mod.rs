//! The credential store seam.
//!
//! Handlers talk to a `dyn UserStore` so the server can run against
//! PostgreSQL ([`PgUserStore`]) or, when no database is configured, a
//! process-local map ([`MemoryUserStore`]).

use sitescore_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Errors returned by [`UserStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with an existing unique value (e.g. email).
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// Any other failure from the database driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Apply the `Some` fields of `input`. Returns `None` if `id` does not exist.
    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError>;

    /// Returns `true` if a user was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
