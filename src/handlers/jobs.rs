use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_job_owner};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::jobs as job_db;
use crate::error::ApiError;
use crate::models::jobs::{CreateJob, UpdateJob};
use crate::models::users::Roles;

/// POST /api/jobs — a client posts a new job (starts `open`).
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateJob>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Roles::Client)?;
    body.validate()?;

    let job = job_db::insert_job(db.get_ref(), body.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Created().json(job))
}

/// GET /api/jobs — list every posted job. Public read.
pub async fn get_jobs(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let jobs = job_db::get_all_jobs(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/{id} — get a single job. Public read.
pub async fn get_job(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {id} does not exist")))?;
    Ok(HttpResponse::Ok().json(job))
}

/// GET /api/jobs/mine — list the authenticated client's own jobs.
pub async fn get_my_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let jobs = job_db::get_jobs_by_client_id(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// PUT /api/jobs/{id} — owner patches title/description/budget/deadline/status.
pub async fn update_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateJob>,
) -> Result<HttpResponse, ApiError> {
    let job = verify_job_owner(db.get_ref(), path.into_inner(), user.0.id).await?;
    let updated = job_db::update_job(db.get_ref(), job, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/jobs/{id} — owner deletes the job and every proposal on it.
pub async fn delete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = verify_job_owner(db.get_ref(), path.into_inner(), user.0.id).await?;
    job_db::delete_job_cascade(db.get_ref(), job.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("job {} deleted", job.id),
    })))
}
