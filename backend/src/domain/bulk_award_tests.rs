//! Behaviour coverage for CSV bulk awards.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ledger::{PointsBalance, Transaction};
use crate::domain::ports::{DirectoryUser, MockLedgerRepository, MockUserDirectory};
use crate::domain::{ErrorCode, Role, UserId};

fn admin() -> CallerIdentity {
    CallerIdentity::new(UserId::random(), Role::Admin)
}

fn directory_user(email: &str) -> DirectoryUser {
    DirectoryUser {
        id: UserId::random(),
        display_name: "Member".to_owned(),
        email: email.to_owned(),
        role: Role::Member,
    }
}

fn recorded(draft: &crate::domain::ledger::TransactionDraft) -> (Transaction, PointsBalance) {
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
        created_at: Utc::now(),
    };
    let mut balance = PointsBalance::zero(draft.user_id);
    balance.total_points = draft.amount.value();
    balance.total_earned = draft.amount.value();
    (transaction, balance)
}

#[rstest]
fn parser_accepts_rows_and_skips_the_header() {
    let (rows, errors) = parse_csv("email,points\nalice@example.com,10\nbob@example.com,10,referral\n");
    assert!(errors.is_empty());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].email, "alice@example.com");
    assert_eq!(rows[0].points, 10);
    assert_eq!(rows[0].reason, "bulk award");
    assert_eq!(rows[1].reason, "referral");
    // Physical line numbers: the header is line 1.
    assert_eq!(rows[0].line, 2);
    assert_eq!(rows[1].line, 3);
}

#[rstest]
#[case("not-an-email,10", "malformed email")]
#[case("alice@example.com,ten", "points must be an integer")]
#[case("alice@example.com,0", "points must be positive")]
#[case("alice@example.com,-3", "points must be positive")]
fn parser_reports_bad_rows_with_line_numbers(#[case] row: &str, #[case] fragment: &str) {
    let (rows, errors) = parse_csv(row);
    assert!(rows.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert!(
        errors[0].reason.contains(fragment),
        "unexpected reason: {}",
        errors[0].reason
    );
}

#[rstest]
fn parser_skips_blank_lines() {
    let (rows, errors) = parse_csv("alice@example.com,10\n\n\nbob@example.com,5\n");
    assert!(errors.is_empty());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].line, 4);
}

#[rstest]
#[tokio::test]
async fn bulk_award_requires_the_admin_capability() {
    let service = BulkAwardService::new(
        Arc::new(MockLedgerRepository::new()),
        Arc::new(MockUserDirectory::new()),
        Arc::new(DefaultClock),
    );

    let caller = CallerIdentity::new(UserId::random(), Role::Member);
    let err = service
        .award_csv(&caller, "alice@example.com,10")
        .await
        .expect_err("member may not bulk award");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn two_valid_rows_and_one_malformed_email() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_email()
        .returning(|email| Ok(Some(directory_user(email))));
    let mut ledger = MockLedgerRepository::new();
    ledger
        .expect_record()
        .times(2)
        .returning(|draft| Ok(recorded(draft)));

    let service = BulkAwardService::new(
        Arc::new(ledger),
        Arc::new(directory),
        Arc::new(DefaultClock),
    );

    let outcome = service
        .award_csv(
            &admin(),
            "alice@example.com,10\nnot-an-email,10\nbob@example.com,10\n",
        )
        .await
        .expect("batch completes");

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].line, 2);
    assert!(outcome.errors[0].reason.contains("malformed email"));
}

#[rstest]
#[tokio::test]
async fn unknown_user_fails_only_its_own_row() {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_email().returning(|email| {
        if email == "ghost@example.com" {
            Ok(None)
        } else {
            Ok(Some(directory_user(email)))
        }
    });
    let mut ledger = MockLedgerRepository::new();
    ledger
        .expect_record()
        .times(1)
        .returning(|draft| Ok(recorded(draft)));

    let service = BulkAwardService::new(
        Arc::new(ledger),
        Arc::new(directory),
        Arc::new(DefaultClock),
    );

    let outcome = service
        .award_csv(&admin(), "ghost@example.com,10\nalice@example.com,10\n")
        .await
        .expect("batch completes");

    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].line, 1);
    assert!(outcome.errors[0].reason.contains("no user with email"));
}
