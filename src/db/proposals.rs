use sea_orm::*;
use uuid::Uuid;

use crate::db::{jobs as job_db, orders as order_db};
use crate::error::ApiError;
use crate::models::jobs::{self, JobStatus};
use crate::models::orders;
use crate::models::proposals::{self, ProposalStatus, SubmitProposal};

/// Submit a proposal for a job. At most one proposal per (job, freelancer):
/// a pre-insert check catches the common case and the unique index on
/// (job_id, freelancer_id) serializes concurrent submissions.
pub async fn submit_proposal(
    db: &DatabaseConnection,
    job_id: Uuid,
    freelancer_id: Uuid,
    input: SubmitProposal,
) -> Result<proposals::Model, ApiError> {
    let existing = proposals::Entity::find()
        .filter(proposals::Column::JobId.eq(job_id))
        .filter(proposals::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "you have already submitted a proposal for this job".to_string(),
        ));
    }

    let new_proposal = proposals::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job_id),
        freelancer_id: Set(freelancer_id),
        cover_letter: Set(input.cover_letter),
        propose_rate: Set(input.propose_rate),
        status: Set(ProposalStatus::Submitted),
        created_at: Set(chrono::Utc::now()),
    };

    match new_proposal.insert(db).await {
        Ok(proposal) => Ok(proposal),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(ApiError::Conflict(
                "you have already submitted a proposal for this job".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch a single proposal by ID.
pub async fn get_proposal_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<proposals::Model>, DbErr> {
    proposals::Entity::find_by_id(id).one(db).await
}

/// Fetch all proposals submitted against one job.
pub async fn get_proposals_by_job_id(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<proposals::Model>, DbErr> {
    proposals::Entity::find()
        .filter(proposals::Column::JobId.eq(job_id))
        .all(db)
        .await
}

/// Aggregate proposals across every job owned by `client_id`.
///
/// `NotFound` when the client owns no jobs at all.
pub async fn get_proposals_for_client_jobs(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<proposals::Model>, ApiError> {
    let jobs = job_db::get_jobs_by_client_id(db, client_id).await?;
    if jobs.is_empty() {
        return Err(ApiError::NotFound(
            "you have not posted any jobs".to_string(),
        ));
    }

    let job_ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    let all = proposals::Entity::find()
        .filter(proposals::Column::JobId.is_in(job_ids))
        .all(db)
        .await?;
    Ok(all)
}

/// Accept a proposal: proposal → `accepted`, order created `active`, job →
/// `inprogress`, all inside one transaction.
///
/// The status flip is a conditional update on `submitted`, so of any number of
/// concurrent deciders exactly one wins; the rest observe the terminal state
/// and get `Conflict` with nothing applied.
pub async fn accept_proposal(
    db: &DatabaseConnection,
    proposal: &proposals::Model,
    job: &jobs::Model,
) -> Result<(proposals::Model, orders::Model), ApiError> {
    let txn = db.begin().await?;

    let claimed = proposals::Entity::update_many()
        .set(proposals::ActiveModel {
            status: Set(ProposalStatus::Accepted),
            ..Default::default()
        })
        .filter(proposals::Column::Id.eq(proposal.id))
        .filter(proposals::Column::Status.eq(ProposalStatus::Submitted))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(already_decided(db, proposal.id).await);
    }

    let order = order_db::insert_order(&txn, job, proposal).await?;
    job_db::set_status(&txn, job.id, JobStatus::InProgress).await?;

    txn.commit().await?;
    tracing::info!(
        proposal_id = %proposal.id,
        job_id = %job.id,
        order_id = %order.id,
        "proposal accepted"
    );

    let accepted = proposals::Model {
        status: ProposalStatus::Accepted,
        ..proposal.clone()
    };
    Ok((accepted, order))
}

/// Reject a proposal. Job and job status are untouched.
pub async fn reject_proposal(
    db: &DatabaseConnection,
    proposal: &proposals::Model,
) -> Result<proposals::Model, ApiError> {
    let claimed = proposals::Entity::update_many()
        .set(proposals::ActiveModel {
            status: Set(ProposalStatus::Rejected),
            ..Default::default()
        })
        .filter(proposals::Column::Id.eq(proposal.id))
        .filter(proposals::Column::Status.eq(ProposalStatus::Submitted))
        .exec(db)
        .await?;

    if claimed.rows_affected == 0 {
        return Err(already_decided(db, proposal.id).await);
    }

    tracing::info!(proposal_id = %proposal.id, "proposal rejected");
    Ok(proposals::Model {
        status: ProposalStatus::Rejected,
        ..proposal.clone()
    })
}

/// The conditional update matched no row: either the proposal reached a
/// terminal state concurrently, or it vanished. Re-read to report which.
async fn already_decided(db: &DatabaseConnection, proposal_id: Uuid) -> ApiError {
    match proposals::Entity::find_by_id(proposal_id).one(db).await {
        Ok(Some(current)) => ApiError::Conflict(format!(
            "proposal has already been {}",
            match current.status {
                ProposalStatus::Accepted => "accepted",
                ProposalStatus::Rejected => "rejected",
                ProposalStatus::Submitted => "decided",
            }
        )),
        Ok(None) => ApiError::NotFound("proposal does not exist".to_string()),
        Err(e) => e.into(),
    }
}
