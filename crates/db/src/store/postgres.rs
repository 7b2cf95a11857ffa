use sitescore_core::types::DbId;

use super::{StoreError, UserStore};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::UserRepo;
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-constraint violation on a `uq_` constraint into [`StoreError::Duplicate`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return StoreError::Duplicate(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError> {
        UserRepo::update(&self.pool, id, input)
            .await
            .map_err(classify)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(UserRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
