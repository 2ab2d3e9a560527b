//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel.
//!
//! Idempotency comes from the unique (user, event) constraint plus
//! `ON CONFLICT DO NOTHING`: the second registration inserts nothing and
//! is reported as already registered.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::enrollment::{EventRegistration, RegistrationOutcome};
use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EventRegistrationRow, NewEventRegistrationRow};
use super::pool::{DbPool, PoolError};
use super::schema::event_registrations;

/// Diesel-backed implementation of the enrollment repository port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EnrollmentRepositoryError {
    map_pool_error(error, EnrollmentRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EnrollmentRepositoryError {
    map_diesel_error(
        error,
        EnrollmentRepositoryError::query,
        EnrollmentRepositoryError::connection,
    )
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn register(
        &self,
        user_id: &UserId,
        event_id: &Uuid,
    ) -> Result<RegistrationOutcome, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewEventRegistrationRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            event_id: *event_id,
            created_at: Utc::now(),
        };

        let inserted: Option<EventRegistrationRow> =
            diesel::insert_into(event_registrations::table)
                .values(&new_row)
                .on_conflict((
                    event_registrations::user_id,
                    event_registrations::event_id,
                ))
                .do_nothing()
                .returning(EventRegistrationRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel)?;

        Ok(match inserted {
            Some(row) => RegistrationOutcome::Created(EventRegistration {
                id: row.id,
                user_id: UserId::from_uuid(row.user_id),
                event_id: row.event_id,
                created_at: row.created_at,
            }),
            None => RegistrationOutcome::AlreadyRegistered,
        })
    }
}
