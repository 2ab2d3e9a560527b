//! Driving ports for notification dispatch and reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notifications::{Notification, NotificationEvent};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::{CallerIdentity, Error};

/// Best-effort notification outbox.
///
/// Semantics: at most once, no retry. `enqueue` never fails the caller;
/// insert or relay failures are logged and swallowed. Duplicate events are
/// possible if the triggering request itself is retried, since no
/// idempotency key is tracked.
#[async_trait]
pub trait BestEffortNotifier: Send + Sync {
    /// Attempt delivery of one event and move on regardless of outcome.
    async fn enqueue(&self, event: NotificationEvent);
}

/// One page of a user's notifications.
#[derive(Debug, Clone)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub page: PageInfo,
}

/// Use-case port for reading and acknowledging notifications.
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// Newest-first page of the caller's notifications.
    async fn list(
        &self,
        caller: &CallerIdentity,
        page: PageRequest,
    ) -> Result<NotificationPage, Error>;

    /// Mark one of the caller's notifications as read.
    async fn mark_read(&self, caller: &CallerIdentity, notification_id: Uuid)
        -> Result<(), Error>;
}

/// Notifier that silently drops every event; used in tests and no-database
/// wiring where the documented weak guarantee makes this legal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotifier;

#[async_trait]
impl BestEffortNotifier for FixtureNotifier {
    async fn enqueue(&self, _event: NotificationEvent) {}
}

/// Fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationsQuery;

#[async_trait]
impl NotificationsQuery for FixtureNotificationsQuery {
    async fn list(
        &self,
        _caller: &CallerIdentity,
        page: PageRequest,
    ) -> Result<NotificationPage, Error> {
        Ok(NotificationPage {
            notifications: Vec::new(),
            page: PageInfo::new(0, &page),
        })
    }

    async fn mark_read(
        &self,
        _caller: &CallerIdentity,
        notification_id: Uuid,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "notification {notification_id} not found"
        )))
    }
}
