//! Points/currency ledger entities and invariants.
//!
//! The ledger is an append-only record of point and real-currency
//! movements. Point transactions are immutable once created; refunds are
//! modelled as new offsetting transactions. A derived balance row per user
//! tracks `total_points`, `total_earned`, and `total_spent` and must keep
//! `total_points == total_earned - total_spent` non-negative at all times.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by ledger constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerValidationError {
    NonPositiveAmount,
    EmptyReason,
    UnknownKind,
    UnknownDirection,
    UnknownStatus,
}

impl fmt::Display for LedgerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "amount must be a positive integer"),
            Self::EmptyReason => write!(f, "reason must not be empty"),
            Self::UnknownKind => write!(f, "kind must be points or real"),
            Self::UnknownDirection => write!(f, "direction must be earn or spend"),
            Self::UnknownStatus => {
                write!(f, "status must be pending, completed, failed, or cancelled")
            }
        }
    }
}

impl std::error::Error for LedgerValidationError {}

/// Whether a transaction moves loyalty points or real currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Points,
    Real,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Real => "real",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(Self::Points),
            "real" => Ok(Self::Real),
            _ => Err(LedgerValidationError::UnknownKind),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Earn,
    Spend,
}

impl TransactionDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
        }
    }
}

impl FromStr for TransactionDirection {
    type Err = LedgerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earn" => Ok(Self::Earn),
            "spend" => Ok(Self::Spend),
            _ => Err(LedgerValidationError::UnknownDirection),
        }
    }
}

impl fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status carried only by real-currency transactions.
///
/// Pending is the sole non-terminal state; a transaction settles exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealTransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl RealTransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether `next` is an admissible successor of `self`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Completed | Self::Failed | Self::Cancelled
            )
        )
    }
}

impl FromStr for RealTransactionStatus {
    type Err = LedgerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(LedgerValidationError::UnknownStatus),
        }
    }
}

impl fmt::Display for RealTransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive integer amount of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointsAmount(i64);

impl PointsAmount {
    /// Validate and wrap a raw amount.
    pub fn new(amount: i64) -> Result<Self, LedgerValidationError> {
        if amount > 0 {
            Ok(Self(amount))
        } else {
            Err(LedgerValidationError::NonPositiveAmount)
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Non-empty free-text reason attached to every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason(String);

impl Reason {
    pub fn new(reason: impl Into<String>) -> Result<Self, LedgerValidationError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(LedgerValidationError::EmptyReason);
        }
        Ok(Self(reason))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Reason> for String {
    fn from(value: Reason) -> Self {
        value.0
    }
}

/// Validated input for appending a transaction to the ledger.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: PointsAmount,
    pub direction: TransactionDirection,
    pub reason: Reason,
    pub category_id: Option<Uuid>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl TransactionDraft {
    /// Initial settlement status for the draft: real transactions start
    /// pending, point transactions carry no status at all.
    pub fn initial_status(&self) -> Option<RealTransactionStatus> {
        match self.kind {
            TransactionKind::Real => Some(RealTransactionStatus::Pending),
            TransactionKind::Points => None,
        }
    }
}

/// A recorded ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: i64,
    pub direction: TransactionDirection,
    pub reason: String,
    pub category_id: Option<Uuid>,
    pub metadata: Option<Value>,
    pub status: Option<RealTransactionStatus>,
    pub status_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user derived balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsBalance {
    pub user_id: UserId,
    pub total_points: i64,
    pub total_earned: i64,
    pub total_spent: i64,
}

/// Raised when a spend would drive the balance negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("insufficient points: {available} available, {requested} requested")]
pub struct InsufficientPoints {
    pub available: i64,
    pub requested: i64,
}

impl PointsBalance {
    /// Lazily-created zero balance for a user's first points interaction.
    pub fn zero(user_id: UserId) -> Self {
        Self {
            user_id,
            total_points: 0,
            total_earned: 0,
            total_spent: 0,
        }
    }

    /// `total_points == total_earned - total_spent` and never negative.
    pub fn is_consistent(&self) -> bool {
        self.total_points == self.total_earned - self.total_spent && self.total_points >= 0
    }

    /// Apply a movement, preserving the balance invariant.
    ///
    /// Spends exceeding `total_points` are rejected without mutating the
    /// balance.
    pub fn apply(
        &mut self,
        direction: TransactionDirection,
        amount: PointsAmount,
    ) -> Result<(), InsufficientPoints> {
        match direction {
            TransactionDirection::Earn => {
                self.total_points += amount.value();
                self.total_earned += amount.value();
            }
            TransactionDirection::Spend => {
                if amount.value() > self.total_points {
                    return Err(InsufficientPoints {
                        available: self.total_points,
                        requested: amount.value(),
                    });
                }
                self.total_points -= amount.value();
                self.total_spent += amount.value();
            }
        }
        Ok(())
    }
}

/// Optional narrowing filters for transaction history queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub direction: Option<TransactionDirection>,
    pub status: Option<RealTransactionStatus>,
}
