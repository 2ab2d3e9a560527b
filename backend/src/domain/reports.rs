//! Read-only aggregation figures for the admin dashboard.

use serde::Serialize;
use utoipa::ToSchema;

/// Counts shown on the administrative dashboard.
///
/// Every figure is a single aggregate query against live data; nothing here
/// is cached or denormalised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub user_count: i64,
    pub active_job_count: i64,
    pub jobs_pending_review: i64,
    pub transaction_count: i64,
    pub points_issued: i64,
    pub points_spent: i64,
    pub unread_notification_count: i64,
}
