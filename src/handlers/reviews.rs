use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::verify_order_client;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::reviews as review_db;
use crate::error::ApiError;
use crate::models::reviews::CreateReview;

/// POST /api/orders/{id}/reviews — the order's client reviews a completed
/// order.
pub async fn add_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let order = verify_order_client(db.get_ref(), path.into_inner(), user.0.id).await?;
    let review = review_db::add_review(db.get_ref(), &order, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /api/reviews/freelancer/{id} — all reviews a freelancer has received.
/// Public read.
pub async fn get_reviews_for_freelancer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let reviews = review_db::get_reviews_by_freelancer_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}
