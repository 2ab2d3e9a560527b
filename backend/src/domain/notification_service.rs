//! Notification dispatch and read services.
//!
//! Dispatch implements the best-effort outbox contract: one insert attempt,
//! one optional email hand-off, no retries, and no failure propagation to
//! the triggering operation.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notifications::NotificationEvent;
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::ports::{
    BestEffortNotifier, Mailer, NotificationPage, NotificationRepository,
    NotificationRepositoryError, NotificationsQuery,
};
use crate::domain::{CallerIdentity, Error};

fn map_notification_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

/// Best-effort dispatcher over the notification repository and mail relay.
pub struct NotificationDispatchService<R, M> {
    notification_repo: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> NotificationDispatchService<R, M> {
    /// Create a new dispatcher.
    pub fn new(notification_repo: Arc<R>, mailer: Arc<M>) -> Self {
        Self {
            notification_repo,
            mailer,
        }
    }
}

#[async_trait]
impl<R, M> BestEffortNotifier for NotificationDispatchService<R, M>
where
    R: NotificationRepository,
    M: Mailer,
{
    async fn enqueue(&self, event: NotificationEvent) {
        if let Err(error) = self.notification_repo.insert(&event.notification).await {
            tracing::warn!(
                user_id = %event.notification.user_id,
                title = %event.notification.title,
                error = %error,
                "notification insert failed; dropping event"
            );
        }

        if let Some(email) = &event.email {
            if let Err(error) = self.mailer.send(email).await {
                tracing::warn!(
                    to = %email.to,
                    subject = %email.subject,
                    error = %error,
                    "email hand-off failed; dropping message"
                );
            }
        }
    }
}

/// Read service for a user's notification feed.
#[derive(Clone)]
pub struct NotificationQueryService<R> {
    notification_repo: Arc<R>,
}

impl<R> NotificationQueryService<R> {
    /// Create a new query service.
    pub fn new(notification_repo: Arc<R>) -> Self {
        Self { notification_repo }
    }
}

#[async_trait]
impl<R> NotificationsQuery for NotificationQueryService<R>
where
    R: NotificationRepository,
{
    async fn list(
        &self,
        caller: &CallerIdentity,
        page: PageRequest,
    ) -> Result<NotificationPage, Error> {
        let (notifications, total) = self
            .notification_repo
            .list_for_user(caller.user_id(), &page)
            .await
            .map_err(map_notification_repository_error)?;
        Ok(NotificationPage {
            notifications,
            page: PageInfo::new(total, &page),
        })
    }

    async fn mark_read(
        &self,
        caller: &CallerIdentity,
        notification_id: Uuid,
    ) -> Result<(), Error> {
        let updated = self
            .notification_repo
            .mark_read(caller.user_id(), &notification_id)
            .await
            .map_err(map_notification_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "notification {notification_id} not found"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notifications::{
        EmailMessage, NotificationDraft, NotificationKind, NotificationPriority,
    };
    use crate::domain::ports::{MailerError, MockMailer, MockNotificationRepository};
    use crate::domain::{ErrorCode, Role, UserId};
    use rstest::rstest;

    fn caller() -> CallerIdentity {
        CallerIdentity::new(UserId::random(), Role::Member)
    }

    fn event(email: Option<EmailMessage>) -> NotificationEvent {
        NotificationEvent {
            notification: NotificationDraft {
                user_id: UserId::random(),
                title: "Job Posting Approved".to_owned(),
                message: "Your posting is live".to_owned(),
                kind: NotificationKind::JobApproval,
                priority: NotificationPriority::Normal,
                reference_id: None,
                reference_kind: None,
                payload: None,
            },
            email,
        }
    }

    fn stored(draft: &NotificationDraft) -> crate::domain::notifications::Notification {
        crate::domain::notifications::Notification {
            id: uuid::Uuid::new_v4(),
            user_id: draft.user_id,
            title: draft.title.clone(),
            message: draft.message.clone(),
            kind: draft.kind,
            priority: draft.priority,
            reference_id: draft.reference_id,
            reference_kind: draft.reference_kind.clone(),
            payload: draft.payload.clone(),
            is_read: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn insert_failure_is_swallowed() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .returning(|_| Err(NotificationRepositoryError::query("duplicate key")));
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let dispatcher = NotificationDispatchService::new(Arc::new(repo), Arc::new(mailer));
        // No panic and no error surface: the contract is fire-and-forget.
        dispatcher.enqueue(event(None)).await;
    }

    #[rstest]
    #[tokio::test]
    async fn email_failure_is_swallowed_after_the_insert() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().returning(|draft| Ok(stored(draft)));
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailerError::send("relay timeout")));

        let dispatcher = NotificationDispatchService::new(Arc::new(repo), Arc::new(mailer));
        dispatcher
            .enqueue(event(Some(EmailMessage {
                to: "owner@example.com".to_owned(),
                subject: "Approved".to_owned(),
                body: "Your posting is live".to_owned(),
            })))
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn email_is_still_attempted_when_the_insert_fails() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .returning(|_| Err(NotificationRepositoryError::connection("refused")));
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let dispatcher = NotificationDispatchService::new(Arc::new(repo), Arc::new(mailer));
        dispatcher
            .enqueue(event(Some(EmailMessage {
                to: "owner@example.com".to_owned(),
                subject: "Approved".to_owned(),
                body: "Your posting is live".to_owned(),
            })))
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn mark_read_of_a_foreign_notification_is_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().returning(|_, _| Ok(false));
        let service = NotificationQueryService::new(Arc::new(repo));

        let err = service
            .mark_read(&caller(), uuid::Uuid::new_v4())
            .await
            .expect_err("nothing updated");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_carries_pagination_math() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_list_for_user()
            .returning(|_, _| Ok((Vec::new(), 5)));
        let service = NotificationQueryService::new(Arc::new(repo));

        let page = service
            .list(&caller(), PageRequest::new(Some(1), Some(2)))
            .await
            .expect("page");
        assert_eq!(page.page.total, 5);
        assert_eq!(page.page.total_pages, 3);
    }
}
