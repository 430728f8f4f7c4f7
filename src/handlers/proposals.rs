use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_job_owner};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::{jobs as job_db, proposals as proposal_db};
use crate::error::ApiError;
use crate::models::proposals::{DecideProposal, Decision, SubmitProposal};
use crate::models::users::Roles;

/// POST /api/jobs/{id}/proposals — a freelancer submits a proposal.
///
/// The job only has to exist; proposals against non-open jobs are allowed
/// (the client simply won't accept them).
pub async fn submit_proposal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitProposal>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Roles::Freelancer)?;
    body.validate()?;

    let job_id = path.into_inner();
    job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id} does not exist")))?;

    let proposal =
        proposal_db::submit_proposal(db.get_ref(), job_id, user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(proposal))
}

/// PUT /api/proposals/{id}/decision — the job's client accepts or rejects.
///
/// Acceptance atomically flips the proposal, creates the order, and moves the
/// job to `inprogress`; rejection only flips the proposal.
pub async fn decide_proposal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<DecideProposal>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Roles::Client)?;

    let proposal_id = path.into_inner();
    let proposal = proposal_db::get_proposal_by_id(db.get_ref(), proposal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("proposal {proposal_id} does not exist")))?;

    // Decision authority belongs to the owner of the proposal's job.
    let job = verify_job_owner(db.get_ref(), proposal.job_id, user.0.id).await?;

    match body.decision {
        Decision::Accepted => {
            let (proposal, order) =
                proposal_db::accept_proposal(db.get_ref(), &proposal, &job).await?;
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "proposal": proposal,
                "order": order,
            })))
        }
        Decision::Rejected => {
            let proposal = proposal_db::reject_proposal(db.get_ref(), &proposal).await?;
            Ok(HttpResponse::Ok().json(serde_json::json!({ "proposal": proposal })))
        }
    }
}

/// GET /api/jobs/{id}/proposals — the job's owner lists its proposals.
pub async fn get_proposals_for_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = verify_job_owner(db.get_ref(), path.into_inner(), user.0.id).await?;
    let proposals = proposal_db::get_proposals_by_job_id(db.get_ref(), job.id).await?;
    Ok(HttpResponse::Ok().json(proposals))
}

/// GET /api/proposals — proposals across every job the client owns.
pub async fn get_proposals_for_my_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let proposals = proposal_db::get_proposals_for_client_jobs(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(proposals))
}
