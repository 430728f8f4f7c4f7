//! End-to-end lifecycle tests for the job/proposal/order/review state machine,
//! run against a throwaway SQLite database with the real migrations applied.

mod common;

use common::*;
use worknest_backend::db;
use worknest_backend::models::jobs::{JobStatus, UpdateJob};
use worknest_backend::models::orders::OrderStatus;
use worknest_backend::models::proposals::{ProposalStatus, SubmitProposal};
use worknest_backend::models::reviews::CreateReview;
use worknest_backend::storage::{DeliverableStore, MemoryStore};

#[tokio::test]
async fn full_lifecycle_from_job_to_review() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;

    // Client posts a job, freelancer proposes.
    let job = post_job(&db, &client).await;
    assert_eq!(job.status, JobStatus::Open);
    let proposal = submit(&db, &job, &freelancer).await;
    assert_eq!(proposal.status, ProposalStatus::Submitted);

    // Acceptance: proposal accepted, order created active, job inprogress.
    let (accepted, order) = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("accept");
    assert_eq!(accepted.status, ProposalStatus::Accepted);
    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.rate, proposal.propose_rate);
    assert_eq!(order.client_id, client.id);
    assert_eq!(order.freelancer_id, freelancer.id);
    assert_eq!(order.proposal_id, proposal.id);

    let job_now = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::InProgress);

    // Freelancer stores a deliverable, then completes the order.
    let store = MemoryStore::new();
    let stored = store.store("ZGVsaXZlcmFibGU=", "work").await.unwrap();
    let completed = db::orders::complete_order(&db, &order, stored.url.clone())
        .await
        .expect("complete");
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(completed.deliverable_url.as_deref(), Some(stored.url.as_str()));

    let job_now = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::Complete);

    // Client reviews the completed order.
    let order_now = db::orders::get_order_by_id(&db, order.id).await.unwrap().unwrap();
    let review = db::reviews::add_review(
        &db,
        &order_now,
        CreateReview {
            rating: 5,
            comment: "great work".to_string(),
        },
    )
    .await
    .expect("review");
    assert_eq!(review.order_id, order.id);
    assert_eq!(review.freelancer_id, freelancer.id);

    // No uniqueness is enforced on reviews per order: a second one goes through.
    let second = db::reviews::add_review(
        &db,
        &order_now,
        CreateReview {
            rating: 4,
            comment: "still great".to_string(),
        },
    )
    .await
    .expect("second review");
    assert_ne!(second.id, review.id);

    let all = db::reviews::get_reviews_by_freelancer_id(&db, freelancer.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn job_update_touches_only_the_supplied_fields() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let job = post_job(&db, &client).await;

    let patched = db::jobs::update_job(
        &db,
        job.clone(),
        UpdateJob {
            budget: Some(750.0),
            ..Default::default()
        },
    )
    .await
    .expect("patch budget");
    assert_eq!(patched.budget, 750.0);
    assert_eq!(patched.title, job.title);
    assert_eq!(patched.description, job.description);
    assert_eq!(patched.deadline, None);
    assert_eq!(patched.status, JobStatus::Open);
    assert!(patched.updated_at.is_some());

    let closed = db::jobs::update_job(
        &db,
        patched,
        UpdateJob {
            status: Some(JobStatus::Close),
            ..Default::default()
        },
    )
    .await
    .expect("patch status");
    assert_eq!(closed.status, JobStatus::Close);
    assert_eq!(closed.budget, 750.0);

    let stored = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Close);
    assert_eq!(stored.budget, 750.0);
    assert_eq!(stored.title, job.title);
}

#[tokio::test]
async fn duplicate_proposal_for_same_job_is_a_conflict() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;

    submit(&db, &job, &freelancer).await;
    let err = db::proposals::submit_proposal(
        &db,
        job.id,
        freelancer.id,
        SubmitProposal {
            cover_letter: "second attempt".to_string(),
            propose_rate: 400.0,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    // A different freelancer is still free to propose.
    let other = seed_freelancer(&db).await;
    submit(&db, &job, &other).await;
    let all = db::proposals::get_proposals_by_job_id(&db, job.id).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn decided_proposal_is_immutable() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;

    db::proposals::reject_proposal(&db, &proposal).await.expect("reject");

    // Re-rejecting and late acceptance both fail; the stored state is intact.
    let err = db::proposals::reject_proposal(&db, &proposal).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");
    let err = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let current = db::proposals::get_proposal_by_id(&db, proposal.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, ProposalStatus::Rejected);

    // Rejection never touched the job.
    let job_now = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::Open);
}

#[tokio::test]
async fn failed_acceptance_leaves_no_partial_state() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;

    db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("first accept");

    // Losing a second acceptance must not create a second order or move the
    // job again.
    let err = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let orders = db::orders::get_orders_for_user(&db, &freelancer).await.unwrap();
    assert_eq!(orders.len(), 1);
    let job_now = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::InProgress);
}

#[tokio::test]
async fn terminal_order_rejects_further_transitions() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;
    let (_, order) = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("accept");

    let cancelled = db::orders::cancel_order(&db, &order).await.expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    let job_now = db::jobs::get_job_by_id(&db, job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::Close);

    // Neither completion nor a second cancellation may touch it now.
    let err = db::orders::complete_order(&db, &order, "memory://work/x".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");
    assert!(err.to_string().contains("cancelled"));
    let err = db::orders::cancel_order(&db, &order).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let current = db::orders::get_order_by_id(&db, order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Cancelled);
    assert_eq!(current.deliverable_url, None);
}

#[tokio::test]
async fn review_requires_a_completed_order() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;
    let (_, order) = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("accept");

    let review = CreateReview {
        rating: 3,
        comment: "ok".to_string(),
    };

    // Active order: explicit conflict.
    let err = db::reviews::add_review(&db, &order, review.clone()).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");

    // Cancelled order: explicit conflict, not a silent success.
    let cancelled = db::orders::cancel_order(&db, &order).await.expect("cancel");
    let err = db::reviews::add_review(&db, &cancelled, review).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let reviews = db::reviews::get_reviews_by_freelancer_id(&db, freelancer.id)
        .await
        .unwrap();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn proposals_may_target_jobs_that_are_no_longer_open() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;
    db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("accept");

    // The job is inprogress now; a late proposal from another freelancer is
    // still recorded (the client simply never accepts it).
    let late = seed_freelancer(&db).await;
    let late_proposal = submit(&db, &job, &late).await;
    assert_eq!(late_proposal.status, ProposalStatus::Submitted);
}

#[tokio::test]
async fn deleting_a_job_removes_its_proposals() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let f1 = seed_freelancer(&db).await;
    let f2 = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let other_job = post_job(&db, &client).await;

    submit(&db, &job, &f1).await;
    submit(&db, &job, &f2).await;
    let surviving = submit(&db, &other_job, &f1).await;

    db::jobs::delete_job_cascade(&db, job.id).await.expect("delete");

    assert!(db::jobs::get_job_by_id(&db, job.id).await.unwrap().is_none());
    let gone = db::proposals::get_proposals_by_job_id(&db, job.id).await.unwrap();
    assert!(gone.is_empty());

    // Proposals on other jobs are untouched.
    let kept = db::proposals::get_proposal_by_id(&db, surviving.id)
        .await
        .unwrap();
    assert!(kept.is_some());
}

#[tokio::test]
async fn proposals_aggregate_across_all_client_jobs() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let f1 = seed_freelancer(&db).await;
    let f2 = seed_freelancer(&db).await;
    let job_a = post_job(&db, &client).await;
    let job_b = post_job(&db, &client).await;

    submit(&db, &job_a, &f1).await;
    submit(&db, &job_b, &f1).await;
    submit(&db, &job_b, &f2).await;

    let all = db::proposals::get_proposals_for_client_jobs(&db, client.id)
        .await
        .expect("aggregate");
    assert_eq!(all.len(), 3);

    // A client with no jobs at all gets NotFound, not an empty list.
    let jobless = seed_client(&db).await;
    let err = db::proposals::get_proposals_for_client_jobs(&db, jobless.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn orders_are_listed_by_role() {
    let db = setup_db().await;
    let client = seed_client(&db).await;
    let freelancer = seed_freelancer(&db).await;
    let job = post_job(&db, &client).await;
    let proposal = submit(&db, &job, &freelancer).await;
    let (_, order) = db::proposals::accept_proposal(&db, &proposal, &job)
        .await
        .expect("accept");

    let as_client = db::orders::get_orders_for_user(&db, &client).await.unwrap();
    let as_freelancer = db::orders::get_orders_for_user(&db, &freelancer).await.unwrap();
    assert_eq!(as_client.len(), 1);
    assert_eq!(as_freelancer.len(), 1);
    assert_eq!(as_client[0].id, order.id);

    // An uninvolved freelancer sees nothing.
    let bystander = seed_freelancer(&db).await;
    let none = db::orders::get_orders_for_user(&db, &bystander).await.unwrap();
    assert!(none.is_empty());
}
