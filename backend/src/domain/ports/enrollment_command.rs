//! Driving port for idempotent event registration.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CallerIdentity, Error};

/// Outcome surfaced to clients; re-registration is success-like, not an
/// error, so retried requests stay idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub registered: bool,
    pub already_registered: bool,
}

/// Use-case port for registering the caller to an event.
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Register the caller; repeated calls report `already_registered`.
    async fn register(
        &self,
        caller: &CallerIdentity,
        event_id: Uuid,
    ) -> Result<RegistrationReceipt, Error>;
}

/// Fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentCommand;

#[async_trait]
impl EnrollmentCommand for FixtureEnrollmentCommand {
    async fn register(
        &self,
        _caller: &CallerIdentity,
        _event_id: Uuid,
    ) -> Result<RegistrationReceipt, Error> {
        Ok(RegistrationReceipt {
            registered: true,
            already_registered: false,
        })
    }
}
