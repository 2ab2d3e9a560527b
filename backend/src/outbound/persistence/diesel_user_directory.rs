//! PostgreSQL-backed `UserDirectory` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DirectoryUser, UserDirectory, UserDirectoryError};
use crate::domain::{Role, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserDirectoryError {
    map_pool_error(error, UserDirectoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> UserDirectoryError {
    map_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> DirectoryUser {
    DirectoryUser {
        id: UserId::from_uuid(row.id),
        display_name: row.display_name,
        email: row.email,
        role: if row.is_admin { Role::Admin } else { Role::Member },
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_user))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_user))
    }
}
