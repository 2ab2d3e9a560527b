//! In-app notification entities.
//!
//! Notifications are created as a side effect of other domain events and
//! delivered best-effort: at most once, never retried, and never allowed to
//! fail the triggering operation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::UserId;

/// Broad classification for routing and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JobApproval,
    Comment,
    Reward,
    System,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JobApproval => "job_approval",
            Self::Comment => "comment",
            Self::Reward => "reward",
            Self::System => "system",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_approval" => Ok(Self::JobApproval),
            "comment" => Ok(Self::Comment),
            "reward" => Ok(Self::Reward),
            "system" => Ok(Self::System),
            _ => Err(UnknownNotificationField::Kind),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl NotificationPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = UnknownNotificationField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(UnknownNotificationField::Priority),
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failures for notification enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnknownNotificationField {
    #[error("kind must be job_approval, comment, reward, or system")]
    Kind,
    #[error("priority must be low, normal, or high")]
    Priority,
}

/// Input for creating one notification row.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub reference_id: Option<Uuid>,
    pub reference_kind: Option<String>,
    pub payload: Option<Value>,
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub reference_id: Option<Uuid>,
    pub reference_kind: Option<String>,
    pub payload: Option<Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Outbound email handed to the mail relay alongside an in-app row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// One best-effort dispatch: an in-app row plus an optional email.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub notification: NotificationDraft,
    pub email: Option<EmailMessage>,
}

impl NotificationEvent {
    /// In-app-only event.
    pub fn in_app(notification: NotificationDraft) -> Self {
        Self {
            notification,
            email: None,
        }
    }

    /// Attach an outbound email to the event.
    pub fn with_email(mut self, email: EmailMessage) -> Self {
        self.email = Some(email);
        self
    }
}
