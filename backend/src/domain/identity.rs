//! Caller identity value objects.
//!
//! Authorisation is never ambient: every driving-port operation receives a
//! [`CallerIdentity`] describing who is acting and with which role, so
//! use-cases stay testable without a live session provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;

/// Validation errors raised by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    EmptyId,
    InvalidId,
    UnknownRole,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::UnknownRole => write!(f, "role must be member or admin"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability level attached to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Stable string form used in sessions and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(IdentityValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated caller passed explicitly into every use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    user_id: UserId,
    role: Role,
}

impl CallerIdentity {
    /// Bundle a user id with its role.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// The acting user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The caller's capability level.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds the admin capability.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Reject non-admin callers with `403 Forbidden`.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin capability required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn parse_rejects_invalid_ids() {
        assert_eq!(UserId::parse(""), Err(IdentityValidationError::EmptyId));
        assert_eq!(
            UserId::parse("not-a-uuid"),
            Err(IdentityValidationError::InvalidId)
        );
    }

    #[rstest]
    fn parse_accepts_uuids() {
        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("member", Role::Member)]
    #[case("admin", Role::Admin)]
    fn role_round_trips(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(raw.parse::<Role>().expect("known role"), role);
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn member_is_refused_admin_capability() {
        let caller = CallerIdentity::new(UserId::random(), Role::Member);
        let err = caller.require_admin().expect_err("member is not admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn admin_passes_capability_check() {
        let caller = CallerIdentity::new(UserId::random(), Role::Admin);
        assert!(caller.require_admin().is_ok());
    }
}
