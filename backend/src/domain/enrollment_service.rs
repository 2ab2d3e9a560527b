//! Idempotent event registration service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::enrollment::RegistrationOutcome;
use crate::domain::ports::{
    EnrollmentCommand, EnrollmentRepository, EnrollmentRepositoryError, RegistrationReceipt,
};
use crate::domain::{CallerIdentity, Error};

fn map_enrollment_repository_error(error: EnrollmentRepositoryError) -> Error {
    match error {
        EnrollmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        EnrollmentRepositoryError::Query { message } => {
            Error::internal(format!("enrollment repository error: {message}"))
        }
    }
}

/// Enrollment service implementing the command driving port.
#[derive(Clone)]
pub struct EnrollmentService<R> {
    enrollment_repo: Arc<R>,
}

impl<R> EnrollmentService<R> {
    /// Create a new service with the enrollment repository.
    pub fn new(enrollment_repo: Arc<R>) -> Self {
        Self { enrollment_repo }
    }
}

#[async_trait]
impl<R> EnrollmentCommand for EnrollmentService<R>
where
    R: EnrollmentRepository,
{
    async fn register(
        &self,
        caller: &CallerIdentity,
        event_id: Uuid,
    ) -> Result<RegistrationReceipt, Error> {
        let outcome = self
            .enrollment_repo
            .register(caller.user_id(), &event_id)
            .await
            .map_err(map_enrollment_repository_error)?;

        // A repeat registration is success-like so client retries stay
        // idempotent.
        Ok(RegistrationReceipt {
            registered: true,
            already_registered: outcome.already_registered(),
        })
    }
}
