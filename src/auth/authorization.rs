//! Reusable authorization predicates, checked before every mutating operation
//! instead of being re-implemented inline per handler.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::{jobs as job_db, orders as order_db};
use crate::error::ApiError;
use crate::models::{jobs, orders, users};

/// The principal must carry the given role.
pub fn require_role(user: &users::Model, role: users::Roles) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        let wanted = match role {
            users::Roles::Client => "client",
            users::Roles::Freelancer => "freelancer",
        };
        Err(ApiError::Forbidden(format!(
            "this operation requires the {wanted} role"
        )))
    }
}

/// The job must exist and be owned by `user_id`.
pub async fn verify_job_owner(
    db: &DatabaseConnection,
    job_id: Uuid,
    user_id: Uuid,
) -> Result<jobs::Model, ApiError> {
    let job = job_db::get_job_by_id(db, job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id} does not exist")))?;

    if job.client_id != user_id {
        return Err(ApiError::Forbidden(
            "you do not own this job".to_string(),
        ));
    }
    Ok(job)
}

/// The order must exist and `user_id` must be its freelancer (completion and
/// cancellation authority).
pub async fn verify_order_freelancer(
    db: &DatabaseConnection,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<orders::Model, ApiError> {
    let order = order_db::get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {order_id} does not exist")))?;

    if order.freelancer_id != user_id {
        return Err(ApiError::Forbidden(
            "you are not the freelancer on this order".to_string(),
        ));
    }
    Ok(order)
}

/// The order must exist and `user_id` must be its client (review authority).
pub async fn verify_order_client(
    db: &DatabaseConnection,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<orders::Model, ApiError> {
    let order = order_db::get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {order_id} does not exist")))?;

    if order.client_id != user_id {
        return Err(ApiError::Forbidden(
            "only the order's client may review it".to_string(),
        ));
    }
    Ok(order)
}
