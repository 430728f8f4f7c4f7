use sea_orm::*;
use uuid::Uuid;

use crate::models::jobs::{self, CreateJob, JobStatus, UpdateJob};
use crate::models::proposals;

/// Insert a new job owned by `client_id` (always starts `open`).
pub async fn insert_job(
    db: &DatabaseConnection,
    input: CreateJob,
    client_id: Uuid,
) -> Result<jobs::Model, DbErr> {
    let new_job = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        deadline: Set(input.deadline),
        status: Set(JobStatus::Open),
        client_id: Set(client_id),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_job.insert(db).await
}

/// Fetch all jobs.
pub async fn get_all_jobs(db: &DatabaseConnection) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find().all(db).await
}

/// Fetch a single job by ID.
pub async fn get_job_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Fetch all jobs owned by a client.
pub async fn get_jobs_by_client_id(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::ClientId.eq(client_id))
        .all(db)
        .await
}

/// Patch only the supplied fields of an already-fetched job.
pub async fn update_job(
    db: &DatabaseConnection,
    job: jobs::Model,
    input: UpdateJob,
) -> Result<jobs::Model, DbErr> {
    let mut active: jobs::ActiveModel = job.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(budget) = input.budget {
        active.budget = Set(budget);
    }
    if let Some(deadline) = input.deadline {
        active.deadline = Set(Some(deadline));
    }
    if let Some(status) = input.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a job and every proposal that references it, in one transaction.
pub async fn delete_job_cascade(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    proposals::Entity::delete_many()
        .filter(proposals::Column::JobId.eq(id))
        .exec(&txn)
        .await?;
    jobs::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(job_id = %id, "job deleted with its proposals");
    Ok(())
}

/// Internal lifecycle transition: overwrite a job's status.
///
/// Only the proposal and order managers call this, inside their own
/// transactions. It is deliberately not reachable from any route, so external
/// principals cannot drive job status outside the accept/complete/cancel flows.
pub(crate) async fn set_status<C: ConnectionTrait>(
    conn: &C,
    job_id: Uuid,
    status: JobStatus,
) -> Result<(), DbErr> {
    jobs::Entity::update_many()
        .set(jobs::ActiveModel {
            status: Set(status),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(jobs::Column::Id.eq(job_id))
        .exec(conn)
        .await?;
    Ok(())
}
