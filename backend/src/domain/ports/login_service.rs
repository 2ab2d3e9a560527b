//! Driving port for authenticating login credentials.

use async_trait::async_trait;

use crate::domain::{CallerIdentity, Error, Role, UserId};

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Build credentials, rejecting blank fields.
    pub fn try_from_parts(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(Error::invalid_request("username must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Use-case port for credential checks.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate and derive the caller identity for the session.
    async fn authenticate(&self, credentials: &LoginCredentials)
        -> Result<CallerIdentity, Error>;
}

/// Fixture login contract used until credential persistence lands.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

pub(crate) const FIXTURE_ADMIN_USERNAME: &str = "admin";
pub(crate) const FIXTURE_MEMBER_USERNAME: &str = "member";
pub(crate) const FIXTURE_PASSWORD: &str = "password";
pub(crate) const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
pub(crate) const FIXTURE_MEMBER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<CallerIdentity, Error> {
        if credentials.password() != FIXTURE_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let (raw_id, role) = match credentials.username() {
            FIXTURE_ADMIN_USERNAME => (FIXTURE_ADMIN_ID, Role::Admin),
            FIXTURE_MEMBER_USERNAME => (FIXTURE_MEMBER_ID, Role::Member),
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        let user_id = UserId::parse(raw_id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        Ok(CallerIdentity::new(user_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn admin_credentials_yield_admin_identity() {
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("valid creds");
        let identity = FixtureLoginService
            .authenticate(&creds)
            .await
            .expect("authenticates");
        assert!(identity.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_unauthorised() {
        let creds = LoginCredentials::try_from_parts("admin", "wrong").expect("valid shape");
        let err = FixtureLoginService
            .authenticate(&creds)
            .await
            .expect_err("rejects");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn blank_username_is_invalid() {
        let err = LoginCredentials::try_from_parts("  ", "pw").expect_err("blank username");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
