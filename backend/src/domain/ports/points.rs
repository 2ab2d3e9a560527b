//! Driving ports for the points ledger.
//!
//! Inbound adapters call these use-cases with an explicit
//! [`CallerIdentity`]; they never see repositories.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ledger::{
    PointsBalance, RealTransactionStatus, Transaction, TransactionDirection, TransactionFilter,
    TransactionKind,
};
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::{CallerIdentity, Error, UserId};

/// Unvalidated input for creating a transaction on the caller's own ledger.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: i64,
    pub direction: TransactionDirection,
    pub reason: String,
    pub category_id: Option<Uuid>,
    pub metadata: Option<Value>,
}

/// Admin-initiated earn on another user's ledger.
#[derive(Debug, Clone)]
pub struct AdminAward {
    pub user_id: UserId,
    pub amount: i64,
    pub reason: String,
    pub category_id: Option<Uuid>,
}

/// A created transaction together with the post-mutation balance.
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub transaction: Transaction,
    pub balance: PointsBalance,
}

/// One page of transaction history.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub page: PageInfo,
}

/// Use-case port for ledger mutations.
#[async_trait]
pub trait PointsCommand: Send + Sync {
    /// Record a transaction on the caller's own ledger.
    async fn create_transaction(
        &self,
        caller: &CallerIdentity,
        input: NewTransaction,
    ) -> Result<TransactionReceipt, Error>;

    /// Award points to another user; requires the admin capability.
    async fn admin_award(
        &self,
        caller: &CallerIdentity,
        input: AdminAward,
    ) -> Result<TransactionReceipt, Error>;

    /// Transition a real transaction the caller owns.
    async fn update_real_transaction_status(
        &self,
        caller: &CallerIdentity,
        transaction_id: Uuid,
        new_status: RealTransactionStatus,
        note: Option<String>,
    ) -> Result<Transaction, Error>;
}

/// Use-case port for ledger reads.
#[async_trait]
pub trait PointsQuery: Send + Sync {
    /// Balance snapshot; zero-valued when the user has no ledger activity.
    async fn balance(&self, caller: &CallerIdentity) -> Result<PointsBalance, Error>;

    /// Newest-first transaction history page.
    async fn transactions(
        &self,
        caller: &CallerIdentity,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error>;
}

/// Fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePointsCommand;

fn fixture_transaction(user_id: UserId, input: &NewTransaction) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        user_id,
        kind: input.kind,
        amount: input.amount,
        direction: input.direction,
        reason: input.reason.clone(),
        category_id: input.category_id,
        metadata: input.metadata.clone(),
        status: match input.kind {
            TransactionKind::Real => Some(RealTransactionStatus::Pending),
            TransactionKind::Points => None,
        },
        status_note: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl PointsCommand for FixturePointsCommand {
    async fn create_transaction(
        &self,
        caller: &CallerIdentity,
        input: NewTransaction,
    ) -> Result<TransactionReceipt, Error> {
        let transaction = fixture_transaction(*caller.user_id(), &input);
        let mut balance = PointsBalance::zero(*caller.user_id());
        if input.kind == TransactionKind::Points {
            balance.total_points = input.amount;
            balance.total_earned = input.amount;
        }
        Ok(TransactionReceipt {
            transaction,
            balance,
        })
    }

    async fn admin_award(
        &self,
        caller: &CallerIdentity,
        input: AdminAward,
    ) -> Result<TransactionReceipt, Error> {
        caller.require_admin()?;
        let new_transaction = NewTransaction {
            kind: TransactionKind::Points,
            amount: input.amount,
            direction: TransactionDirection::Earn,
            reason: input.reason,
            category_id: input.category_id,
            metadata: None,
        };
        let transaction = fixture_transaction(input.user_id, &new_transaction);
        let mut balance = PointsBalance::zero(input.user_id);
        balance.total_points = new_transaction.amount;
        balance.total_earned = new_transaction.amount;
        Ok(TransactionReceipt {
            transaction,
            balance,
        })
    }

    async fn update_real_transaction_status(
        &self,
        _caller: &CallerIdentity,
        transaction_id: Uuid,
        _new_status: RealTransactionStatus,
        _note: Option<String>,
    ) -> Result<Transaction, Error> {
        Err(Error::not_found(format!(
            "transaction {transaction_id} not found"
        )))
    }
}

/// Fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePointsQuery;

#[async_trait]
impl PointsQuery for FixturePointsQuery {
    async fn balance(&self, caller: &CallerIdentity) -> Result<PointsBalance, Error> {
        Ok(PointsBalance::zero(*caller.user_id()))
    }

    async fn transactions(
        &self,
        _caller: &CallerIdentity,
        _filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        Ok(TransactionPage {
            transactions: Vec::new(),
            page: PageInfo::new(0, &page),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_balance_is_zero() {
        let caller = CallerIdentity::new(UserId::random(), Role::Member);
        let balance = FixturePointsQuery
            .balance(&caller)
            .await
            .expect("fixture balance");
        assert_eq!(balance.total_points, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_admin_award_still_gates_on_role() {
        let caller = CallerIdentity::new(UserId::random(), Role::Member);
        let err = FixturePointsCommand
            .admin_award(
                &caller,
                AdminAward {
                    user_id: UserId::random(),
                    amount: 10,
                    reason: "welcome".to_owned(),
                    category_id: None,
                },
            )
            .await
            .expect_err("member may not award");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
