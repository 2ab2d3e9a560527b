//! PostgreSQL-backed `NotificationRepository` implementation using Diesel.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::notifications::{
    Notification, NotificationDraft, NotificationKind, NotificationPriority,
};
use crate::domain::pagination::PageRequest;
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let kind = NotificationKind::from_str(&row.kind)
        .map_err(|err| NotificationRepositoryError::query(format!("decode kind: {err}")))?;
    let priority = NotificationPriority::from_str(&row.priority)
        .map_err(|err| NotificationRepositoryError::query(format!("decode priority: {err}")))?;

    Ok(Notification {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        title: row.title,
        message: row.message,
        kind,
        priority,
        reference_id: row.reference_id,
        reference_kind: row.reference_kind,
        payload: row.payload,
        is_read: row.is_read,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewNotificationRow {
            id: Uuid::new_v4(),
            user_id: *draft.user_id.as_uuid(),
            title: &draft.title,
            message: &draft.message,
            kind: draft.kind.as_str(),
            priority: draft.priority.as_str(),
            reference_id: draft.reference_id,
            reference_kind: draft.reference_kind.as_deref(),
            payload: draft.payload.as_ref(),
            is_read: false,
            created_at: Utc::now(),
        };

        let row: NotificationRow = diesel::insert_into(notifications::table)
            .values(&new_row)
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        row_to_notification(row)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<(Vec<Notification>, i64), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let total: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(page.offset())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let items = rows
            .into_iter()
            .map(row_to_notification)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = diesel::update(
            notifications::table.filter(
                notifications::id
                    .eq(notification_id)
                    .and(notifications::user_id.eq(user_id.as_uuid())),
            ),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for row conversion edge cases.

    use super::*;
    use rstest::rstest;

    fn valid_row() -> NotificationRow {
        NotificationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Job Posting Approved".to_owned(),
            message: "Your posting is live".to_owned(),
            kind: "job_approval".to_owned(),
            priority: "normal".to_owned(),
            reference_id: None,
            reference_kind: None,
            payload: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_decode_known_kinds_and_priorities() {
        let notification = row_to_notification(valid_row()).expect("valid row converts");
        assert_eq!(notification.kind, NotificationKind::JobApproval);
        assert_eq!(notification.priority, NotificationPriority::Normal);
    }

    #[rstest]
    fn rows_reject_unknown_kinds() {
        let mut row = valid_row();
        row.kind = "carrier_pigeon".to_owned();
        let error = row_to_notification(row).expect_err("unknown kind fails");
        assert!(error.to_string().contains("decode kind"));
    }
}
