use sea_orm::*;
use uuid::Uuid;

use crate::db::jobs as job_db;
use crate::error::ApiError;
use crate::models::jobs::{self, JobStatus};
use crate::models::orders::{self, OrderStatus};
use crate::models::proposals;
use crate::models::users::{self, Roles};

/// Create the order for an accepted proposal.
///
/// Internal: only called from inside the proposal-acceptance transaction, so
/// an order can never exist without its proposal being `accepted`.
pub(crate) async fn insert_order<C: ConnectionTrait>(
    conn: &C,
    job: &jobs::Model,
    proposal: &proposals::Model,
) -> Result<orders::Model, DbErr> {
    let new_order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job.id),
        client_id: Set(job.client_id),
        freelancer_id: Set(proposal.freelancer_id),
        proposal_id: Set(proposal.id),
        rate: Set(proposal.propose_rate),
        deliverable_url: Set(None),
        status: Set(OrderStatus::Active),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_order.insert(conn).await
}

/// Fetch a single order by ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id).one(db).await
}

/// Orders where the principal is a party, selected by role.
pub async fn get_orders_for_user(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<Vec<orders::Model>, DbErr> {
    let column = match user.role {
        Roles::Client => orders::Column::ClientId,
        Roles::Freelancer => orders::Column::FreelancerId,
    };
    orders::Entity::find().filter(column.eq(user.id)).all(db).await
}

/// Complete an order: attach the stored deliverable URL, order → `completed`,
/// job → `complete`, all inside one transaction.
///
/// The caller must have stored the deliverable already; this function never
/// runs the upload itself, so a failed upload leaves order and job untouched.
pub async fn complete_order(
    db: &DatabaseConnection,
    order: &orders::Model,
    deliverable_url: String,
) -> Result<orders::Model, ApiError> {
    let txn = db.begin().await?;

    let claimed = orders::Entity::update_many()
        .set(orders::ActiveModel {
            status: Set(OrderStatus::Completed),
            deliverable_url: Set(Some(deliverable_url.clone())),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(orders::Column::Id.eq(order.id))
        .filter(orders::Column::Status.eq(OrderStatus::Active))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(already_terminal(db, order.id).await);
    }

    job_db::set_status(&txn, order.job_id, JobStatus::Complete).await?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, job_id = %order.job_id, "order completed");
    Ok(orders::Model {
        status: OrderStatus::Completed,
        deliverable_url: Some(deliverable_url),
        ..order.clone()
    })
}

/// Cancel an order: order → `cancelled`, job → `close`, in one transaction.
pub async fn cancel_order(
    db: &DatabaseConnection,
    order: &orders::Model,
) -> Result<orders::Model, ApiError> {
    let txn = db.begin().await?;

    let claimed = orders::Entity::update_many()
        .set(orders::ActiveModel {
            status: Set(OrderStatus::Cancelled),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(orders::Column::Id.eq(order.id))
        .filter(orders::Column::Status.eq(OrderStatus::Active))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(already_terminal(db, order.id).await);
    }

    job_db::set_status(&txn, order.job_id, JobStatus::Close).await?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, job_id = %order.job_id, "order cancelled");
    Ok(orders::Model {
        status: OrderStatus::Cancelled,
        ..order.clone()
    })
}

/// Conflict for an order that cannot transition out of its current status.
pub(crate) fn terminal_conflict(status: OrderStatus) -> ApiError {
    ApiError::Conflict(format!(
        "order is already {}",
        match status {
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Active => "being updated",
        }
    ))
}

/// The conditional update matched no row: a concurrent transition won, or the
/// order vanished. Re-read to report which.
async fn already_terminal(db: &DatabaseConnection, order_id: Uuid) -> ApiError {
    match orders::Entity::find_by_id(order_id).one(db).await {
        Ok(Some(current)) => terminal_conflict(current.status),
        Ok(None) => ApiError::NotFound("order does not exist".to_string()),
        Err(e) => e.into(),
    }
}
