//! Training/event enrollment records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// A stored registration of one user for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistration {
    pub id: Uuid,
    pub user_id: UserId,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of an idempotent registration attempt.
///
/// Re-registering is not an error: the second call reports the existing
/// registration so clients can retry freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created(EventRegistration),
    AlreadyRegistered,
}

impl RegistrationOutcome {
    pub fn already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered)
    }
}
