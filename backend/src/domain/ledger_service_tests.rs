//! Behaviour coverage for the ledger services.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockLedgerRepository;
use crate::domain::{ErrorCode, Role};

fn member() -> CallerIdentity {
    CallerIdentity::new(UserId::random(), Role::Member)
}

fn admin() -> CallerIdentity {
    CallerIdentity::new(UserId::random(), Role::Admin)
}

fn new_spend(amount: i64) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Points,
        amount,
        direction: TransactionDirection::Spend,
        reason: "workshop rental".to_owned(),
        category_id: None,
        metadata: None,
    }
}

fn new_earn(amount: i64) -> NewTransaction {
    NewTransaction {
        direction: TransactionDirection::Earn,
        ..new_spend(amount)
    }
}

fn stored_transaction(user_id: UserId, kind: TransactionKind) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        user_id,
        kind,
        amount: 25,
        direction: TransactionDirection::Earn,
        reason: "order".to_owned(),
        category_id: None,
        metadata: None,
        status: match kind {
            TransactionKind::Real => Some(RealTransactionStatus::Pending),
            TransactionKind::Points => None,
        },
        status_note: None,
        created_at: Utc::now(),
    }
}

/// In-memory adapter honouring the guarded-update contract of the port:
/// the overdraw check and both writes happen under one lock.
#[derive(Default)]
struct InMemoryLedger {
    state: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    transactions: Vec<Transaction>,
    balances: HashMap<Uuid, PointsBalance>,
}

#[async_trait]
impl LedgerRepository for InMemoryLedger {
    async fn record(
        &self,
        draft: &TransactionDraft,
    ) -> Result<(Transaction, PointsBalance), LedgerRepositoryError> {
        let mut state = self.state.lock().await;
        let mut balance = state
            .balances
            .get(draft.user_id.as_uuid())
            .copied()
            .unwrap_or_else(|| PointsBalance::zero(draft.user_id));
        if draft.kind == TransactionKind::Points {
            balance.apply(draft.direction, draft.amount).map_err(|err| {
                LedgerRepositoryError::insufficient_points(err.available, err.requested)
            })?;
        }

        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            kind: draft.kind,
            amount: draft.amount.value(),
            direction: draft.direction,
            reason: draft.reason.as_str().to_owned(),
            category_id: draft.category_id,
            metadata: draft.metadata.clone(),
            status: draft.initial_status(),
            status_note: None,
            created_at: draft.created_at,
        };
        state.transactions.push(transaction.clone());
        state.balances.insert(*draft.user_id.as_uuid(), balance);
        Ok((transaction, balance))
    }

    async fn balance(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PointsBalance>, LedgerRepositoryError> {
        Ok(self.state.lock().await.balances.get(user_id.as_uuid()).copied())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        _filter: &TransactionFilter,
        _page: &PageRequest,
    ) -> Result<(Vec<Transaction>, i64), LedgerRepositoryError> {
        let state = self.state.lock().await;
        let matching: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|tx| tx.user_id == *user_id)
            .cloned()
            .collect();
        let total = matching.len() as i64;
        Ok((matching, total))
    }

    async fn find_by_id(
        &self,
        transaction_id: &Uuid,
    ) -> Result<Option<Transaction>, LedgerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .find(|tx| tx.id == *transaction_id)
            .cloned())
    }

    async fn update_real_status(
        &self,
        transaction_id: &Uuid,
        status: RealTransactionStatus,
        note: Option<String>,
    ) -> Result<Transaction, LedgerRepositoryError> {
        let mut state = self.state.lock().await;
        let transaction = state
            .transactions
            .iter_mut()
            .find(|tx| tx.id == *transaction_id)
            .ok_or_else(|| LedgerRepositoryError::not_found(*transaction_id))?;
        transaction.status = Some(status);
        transaction.status_note = note;
        Ok(transaction.clone())
    }

    async fn category_rollups(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<crate::domain::categories::CategoryRollup>, LedgerRepositoryError> {
        Ok(Vec::new())
    }

    async fn category_net(
        &self,
        user_id: &UserId,
        category_id: &Uuid,
    ) -> Result<i64, LedgerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.user_id == *user_id && tx.category_id == Some(*category_id))
            .map(|tx| match tx.direction {
                TransactionDirection::Earn => tx.amount,
                TransactionDirection::Spend => -tx.amount,
            })
            .sum())
    }
}

fn command_service(repo: Arc<InMemoryLedger>) -> LedgerCommandService<InMemoryLedger> {
    LedgerCommandService::new(repo, Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test]
async fn non_positive_amount_never_reaches_the_repository() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let err = service
        .create_transaction(&member(), new_earn(0))
        .await
        .expect_err("zero amount is invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn blank_reason_never_reaches_the_repository() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let mut input = new_earn(10);
    input.reason = "   ".to_owned();
    let err = service
        .create_transaction(&member(), input)
        .await
        .expect_err("blank reason is invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn sequential_spends_stop_at_the_balance() {
    let repo = Arc::new(InMemoryLedger::default());
    let service = command_service(Arc::clone(&repo));
    let caller = member();

    service
        .create_transaction(&caller, new_earn(100))
        .await
        .expect("earn 100");
    let receipt = service
        .create_transaction(&caller, new_spend(60))
        .await
        .expect("first spend fits");
    assert_eq!(receipt.balance.total_points, 40);

    let err = service
        .create_transaction(&caller, new_spend(50))
        .await
        .expect_err("second spend exceeds balance");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("structured details");
    assert_eq!(details["code"], "insufficient_points");
    assert_eq!(details["available"], 40);
    assert_eq!(details["requested"], 50);

    let balance = repo
        .balance(caller.user_id())
        .await
        .expect("balance read")
        .expect("balance exists");
    assert_eq!(balance.total_points, 40);
    assert!(balance.is_consistent());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_spends_never_overdraw() {
    let repo = Arc::new(InMemoryLedger::default());
    let service = Arc::new(command_service(Arc::clone(&repo)));
    let caller = member();

    service
        .create_transaction(&caller, new_earn(100))
        .await
        .expect("earn 100");

    let mut handles = Vec::new();
    for _ in 0..5 {
        let service = Arc::clone(&service);
        let caller = caller.clone();
        handles.push(tokio::spawn(async move {
            service.create_transaction(&caller, new_spend(30)).await
        }));
    }

    let mut successes: i64 = 0;
    for handle in handles {
        if handle.await.expect("task completes").is_ok() {
            successes += 1;
        }
    }

    // 5 * 30 > 100, so at most 3 spends can fit.
    assert!(successes <= 3, "only {successes} spends may fit in 100");
    let balance = repo
        .balance(caller.user_id())
        .await
        .expect("balance read")
        .expect("balance exists");
    assert!(balance.total_points >= 0);
    assert!(balance.is_consistent());
    assert_eq!(balance.total_points, 100 - successes * 30);
}

#[rstest]
#[tokio::test]
async fn admin_award_requires_the_admin_capability() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let err = service
        .admin_award(
            &member(),
            AdminAward {
                user_id: UserId::random(),
                amount: 10,
                reason: "welcome bonus".to_owned(),
                category_id: None,
            },
        )
        .await
        .expect_err("member may not award");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_award_records_an_earn_for_the_target_user() {
    let repo = Arc::new(InMemoryLedger::default());
    let service = command_service(Arc::clone(&repo));
    let target = UserId::random();

    let receipt = service
        .admin_award(
            &admin(),
            AdminAward {
                user_id: target,
                amount: 10,
                reason: "welcome bonus".to_owned(),
                category_id: None,
            },
        )
        .await
        .expect("admin awards");

    assert_eq!(receipt.transaction.user_id, target);
    assert_eq!(receipt.transaction.direction, TransactionDirection::Earn);
    assert_eq!(receipt.balance.total_points, 10);
}

#[rstest]
#[tokio::test]
async fn status_update_rejects_non_owners() {
    let owner = member();
    let stored = stored_transaction(*owner.user_id(), TransactionKind::Real);
    let stored_id = stored.id;

    let mut repo = MockLedgerRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update_real_status().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let err = service
        .update_real_transaction_status(
            &member(),
            stored_id,
            RealTransactionStatus::Completed,
            None,
        )
        .await
        .expect_err("stranger may not settle");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn status_update_rejects_point_transactions() {
    let owner = member();
    let stored = stored_transaction(*owner.user_id(), TransactionKind::Points);
    let stored_id = stored.id;

    let mut repo = MockLedgerRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update_real_status().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let err = service
        .update_real_transaction_status(
            &owner,
            stored_id,
            RealTransactionStatus::Completed,
            None,
        )
        .await
        .expect_err("point transactions are immutable");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn status_update_settles_exactly_once() {
    let owner = member();
    let mut settled = stored_transaction(*owner.user_id(), TransactionKind::Real);
    settled.status = Some(RealTransactionStatus::Completed);
    let settled_id = settled.id;

    let mut repo = MockLedgerRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(settled.clone())));
    repo.expect_update_real_status().never();
    let service = LedgerCommandService::new(Arc::new(repo), Arc::new(DefaultClock));

    let err = service
        .update_real_transaction_status(
            &owner,
            settled_id,
            RealTransactionStatus::Cancelled,
            None,
        )
        .await
        .expect_err("settled transactions stay settled");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn status_update_appends_the_note() {
    let owner = member();
    let repo = Arc::new(InMemoryLedger::default());
    let service = command_service(Arc::clone(&repo));

    let receipt = service
        .create_transaction(
            &owner,
            NewTransaction {
                kind: TransactionKind::Real,
                amount: 50,
                direction: TransactionDirection::Earn,
                reason: "kart order".to_owned(),
                category_id: None,
                metadata: None,
            },
        )
        .await
        .expect("real transaction records");

    let updated = service
        .update_real_transaction_status(
            &owner,
            receipt.transaction.id,
            RealTransactionStatus::Completed,
            Some("payment captured".to_owned()),
        )
        .await
        .expect("pending settles");
    assert_eq!(updated.status, Some(RealTransactionStatus::Completed));
    assert_eq!(updated.status_note.as_deref(), Some("payment captured"));
}

#[rstest]
#[tokio::test]
async fn missing_balance_reads_as_zero() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_balance().returning(|_| Ok(None));
    let service = LedgerQueryService::new(Arc::new(repo));

    let caller = member();
    let balance = service.balance(&caller).await.expect("zero balance");
    assert_eq!(balance.total_points, 0);
    assert_eq!(balance.user_id, *caller.user_id());
}

#[rstest]
#[tokio::test]
async fn transaction_page_carries_pagination_math() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_list_for_user()
        .returning(|_, _, _| Ok((Vec::new(), 41)));
    let service = LedgerQueryService::new(Arc::new(repo));

    let page = service
        .transactions(
            &member(),
            TransactionFilter::default(),
            PageRequest::new(Some(1), Some(20)),
        )
        .await
        .expect("page");
    assert_eq!(page.page.total, 41);
    assert_eq!(page.page.total_pages, 3);
}

#[rstest]
#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_balance()
        .returning(|_| Err(LedgerRepositoryError::connection("refused")));
    let service = LedgerQueryService::new(Arc::new(repo));

    let err = service
        .balance(&member())
        .await
        .expect_err("connection error propagates");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
