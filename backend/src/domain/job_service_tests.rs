//! Behaviour coverage for the job services.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{DirectoryUser, MockJobRepository, MockUserDirectory};
use crate::domain::{ErrorCode, Role, UserId};

fn admin() -> CallerIdentity {
    CallerIdentity::new(UserId::random(), Role::Admin)
}

fn member() -> CallerIdentity {
    CallerIdentity::new(UserId::random(), Role::Member)
}

fn draft() -> JobDraft {
    JobDraft {
        title: "Senior welder".to_owned(),
        description: "TIG work on thin stock".to_owned(),
        company: "Forge & Co".to_owned(),
        category: "trades".to_owned(),
        job_type: "full_time".to_owned(),
        experience_level: "senior".to_owned(),
    }
}

fn posting(owner: UserId) -> JobPosting {
    JobPosting {
        id: Uuid::new_v4(),
        title: "Senior welder".to_owned(),
        description: "TIG work on thin stock".to_owned(),
        company: "Forge & Co".to_owned(),
        category: "trades".to_owned(),
        job_type: "full_time".to_owned(),
        experience_level: "senior".to_owned(),
        posted_by: owner,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// Notifier double capturing every enqueued event.
#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

#[async_trait]
impl BestEffortNotifier for RecordingNotifier {
    async fn enqueue(&self, event: NotificationEvent) {
        self.events.lock().await.push(event);
    }
}

fn empty_directory() -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_id().returning(|_| Ok(None));
    directory
}

fn directory_with(owner: DirectoryUser) -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));
    directory
}

fn command_service(
    repo: MockJobRepository,
    directory: MockUserDirectory,
    notifier: Arc<RecordingNotifier>,
) -> JobCommandService<MockJobRepository> {
    JobCommandService::new(
        Arc::new(repo),
        Arc::new(directory),
        notifier,
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test]
async fn blank_title_never_reaches_the_repository() {
    let mut repo = MockJobRepository::new();
    repo.expect_submit().never();
    let service = command_service(repo, empty_directory(), Arc::default());

    let mut invalid = draft();
    invalid.title = "  ".to_owned();
    let err = service
        .submit(&member(), invalid)
        .await
        .expect_err("blank title");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn submission_enters_the_queue_as_pending() {
    let owner = member();
    let owner_id = *owner.user_id();

    let mut repo = MockJobRepository::new();
    repo.expect_submit().returning(move |user_id, _| {
        let job = posting(*user_id);
        let approval = ApprovalRecord::pending(job.id);
        Ok((job, approval))
    });
    let service = command_service(repo, empty_directory(), Arc::default());

    let submission = service.submit(&owner, draft()).await.expect("submits");
    assert_eq!(submission.job.posted_by, owner_id);
    assert_eq!(submission.approval.status, ApprovalStatus::Pending);
    assert!(submission.job.is_active);
}

#[rstest]
#[tokio::test]
async fn decide_requires_the_admin_capability() {
    let mut repo = MockJobRepository::new();
    repo.expect_find().never();
    repo.expect_decide().never();
    let service = command_service(repo, empty_directory(), Arc::default());

    let err = service
        .decide(
            &member(),
            DecisionRequest {
                job_id: Uuid::new_v4(),
                action: DecisionAction::Approve,
                rejection_reason: None,
            },
        )
        .await
        .expect_err("member may not decide");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn rejection_without_a_reason_is_invalid() {
    let owner = UserId::random();
    let job = posting(owner);
    let job_id = job.id;

    let mut repo = MockJobRepository::new();
    repo.expect_find()
        .returning(move |_| Ok(Some((job.clone(), Some(ApprovalRecord::pending(job_id))))));
    repo.expect_decide().never();
    let service = command_service(repo, empty_directory(), Arc::default());

    let err = service
        .decide(
            &admin(),
            DecisionRequest {
                job_id,
                action: DecisionAction::Reject,
                rejection_reason: None,
            },
        )
        .await
        .expect_err("reason is mandatory");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn rejection_notifies_the_owner_with_reason_and_email() {
    let owner = UserId::random();
    let job = posting(owner);
    let job_id = job.id;

    let mut repo = MockJobRepository::new();
    let found = job.clone();
    repo.expect_find()
        .returning(move |_| Ok(Some((found.clone(), Some(ApprovalRecord::pending(job_id))))));
    repo.expect_decide().returning(|decision| {
        Ok(ApprovalRecord {
            job_id: decision.job_id,
            status: decision.status,
            approver_id: Some(decision.approver_id),
            decided_at: Some(decision.decided_at),
            rejection_reason: decision.rejection_reason.clone(),
        })
    });

    let directory = directory_with(DirectoryUser {
        id: owner,
        display_name: "Jo Smith".to_owned(),
        email: "owner@example.com".to_owned(),
        role: Role::Member,
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let service = command_service(repo, directory, Arc::clone(&notifier));

    let record = service
        .decide(
            &admin(),
            DecisionRequest {
                job_id,
                action: DecisionAction::Reject,
                rejection_reason: Some("low quality".to_owned()),
            },
        )
        .await
        .expect("rejection applies");
    assert_eq!(record.status, ApprovalStatus::Rejected);
    assert_eq!(record.rejection_reason.as_deref(), Some("low quality"));

    let events = notifier.events.lock().await;
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.notification.title, "Job Posting Rejected");
    assert_eq!(event.notification.user_id, owner);
    assert!(event.notification.message.contains("low quality"));
    let email = event.email.as_ref().expect("email attached");
    assert_eq!(email.to, "owner@example.com");
}

#[rstest]
#[tokio::test]
async fn approval_notifies_without_email_when_owner_is_unresolvable() {
    let owner = UserId::random();
    let job = posting(owner);
    let job_id = job.id;

    let mut repo = MockJobRepository::new();
    let found = job.clone();
    repo.expect_find()
        .returning(move |_| Ok(Some((found.clone(), Some(ApprovalRecord::pending(job_id))))));
    repo.expect_decide().returning(|decision| {
        Ok(ApprovalRecord {
            job_id: decision.job_id,
            status: decision.status,
            approver_id: Some(decision.approver_id),
            decided_at: Some(decision.decided_at),
            rejection_reason: None,
        })
    });

    let notifier = Arc::new(RecordingNotifier::default());
    let service = command_service(repo, empty_directory(), Arc::clone(&notifier));

    service
        .decide(
            &admin(),
            DecisionRequest {
                job_id,
                action: DecisionAction::Approve,
                rejection_reason: None,
            },
        )
        .await
        .expect("approval applies");

    let events = notifier.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].notification.title, "Job Posting Approved");
    assert!(events[0].email.is_none());
}

#[rstest]
#[tokio::test]
async fn second_decision_is_a_conflict() {
    let owner = UserId::random();
    let job = posting(owner);
    let job_id = job.id;

    let mut repo = MockJobRepository::new();
    let found = job.clone();
    repo.expect_find().returning(move |_| {
        Ok(Some((
            found.clone(),
            Some(ApprovalRecord {
                status: ApprovalStatus::Approved,
                ..ApprovalRecord::pending(job_id)
            }),
        )))
    });
    repo.expect_decide()
        .returning(move |_| Err(JobRepositoryError::already_decided(job_id)));

    let notifier = Arc::new(RecordingNotifier::default());
    let service = command_service(repo, empty_directory(), Arc::clone(&notifier));

    let err = service
        .decide(
            &admin(),
            DecisionRequest {
                job_id,
                action: DecisionAction::Approve,
                rejection_reason: None,
            },
        )
        .await
        .expect_err("no re-review path");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(notifier.events.lock().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_of_a_foreign_job_is_not_found() {
    let mut repo = MockJobRepository::new();
    repo.expect_delete().returning(|_, _| Ok(false));
    let service = command_service(repo, empty_directory(), Arc::default());

    let err = service
        .delete(&member(), Uuid::new_v4())
        .await
        .expect_err("nothing removed");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn public_listing_carries_pagination_math() {
    let mut repo = MockJobRepository::new();
    repo.expect_list_public()
        .withf(|policy, _| matches!(policy, ApprovalPolicy::ImplicitApprove))
        .returning(|_, _| Ok((vec![posting(UserId::random())], 21)));
    let service = JobQueryService::new(Arc::new(repo), ApprovalPolicy::ImplicitApprove);

    let page = service
        .list_public(PageRequest::new(Some(1), Some(10)))
        .await
        .expect("page");
    assert_eq!(page.jobs.len(), 1);
    assert_eq!(page.page.total, 21);
    assert_eq!(page.page.total_pages, 3);
}
