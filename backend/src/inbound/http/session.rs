//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with the
//! domain-level [`CallerIdentity`]: persist it at login, require it on
//! authenticated routes.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::str::FromStr;

use crate::domain::{CallerIdentity, Error, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper exposing identity-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated caller in the session cookie.
    pub fn persist_identity(&self, identity: &CallerIdentity) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, identity.user_id().to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, identity.role().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the caller identity from the session, if present and valid.
    pub fn identity(&self) -> Result<Option<CallerIdentity>, Error> {
        let raw_id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw_id) = raw_id else {
            return Ok(None);
        };
        let raw_role = self
            .0
            .get::<String>(ROLE_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .unwrap_or_else(|| Role::Member.as_str().to_owned());

        match (UserId::parse(&raw_id), Role::from_str(&raw_role)) {
            (Ok(user_id), Ok(role)) => Ok(Some(CallerIdentity::new(user_id, role))),
            _ => {
                tracing::warn!("invalid identity in session cookie; treating as anonymous");
                Ok(None)
            }
        }
    }

    /// Require an authenticated caller or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<CallerIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated admin caller.
    pub fn require_admin(&self) -> Result<CallerIdentity, Error> {
        let identity = self.require_identity()?;
        identity.require_admin()?;
        Ok(identity)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
