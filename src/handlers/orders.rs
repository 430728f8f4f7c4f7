use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_order_freelancer};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::orders as order_db;
use crate::error::ApiError;
use crate::models::orders::CompleteOrder;
use crate::models::users::Roles;
use crate::storage::DeliverableStore;

/// GET /api/orders — orders where the caller is a party, selected by role.
pub async fn get_orders(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let orders = order_db::get_orders_for_user(db.get_ref(), &user.0).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// POST /api/orders/{id}/complete — the order's freelancer submits the
/// deliverable and completes the order.
///
/// The deliverable is uploaded first; only a successful upload's URL is ever
/// attached to the order, and only then do order and job change state.
pub async fn complete_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    store: web::Data<Arc<dyn DeliverableStore>>,
    path: web::Path<Uuid>,
    body: web::Json<CompleteOrder>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Roles::Freelancer)?;
    body.validate()?;

    let order = verify_order_freelancer(db.get_ref(), path.into_inner(), user.0.id).await?;
    if order.status.is_terminal() {
        // Fail before paying for an upload; the conditional update below this
        // layer still guards the race.
        return Err(order_db::terminal_conflict(order.status));
    }

    let stored = store.store(&body.work, "work").await?;
    let completed = order_db::complete_order(db.get_ref(), &order, stored.url).await?;
    Ok(HttpResponse::Ok().json(completed))
}

/// POST /api/orders/{id}/cancel — the order's freelancer cancels it.
pub async fn cancel_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Roles::Freelancer)?;

    let order = verify_order_freelancer(db.get_ref(), path.into_inner(), user.0.id).await?;
    let cancelled = order_db::cancel_order(db.get_ref(), &order).await?;
    Ok(HttpResponse::Ok().json(cancelled))
}
