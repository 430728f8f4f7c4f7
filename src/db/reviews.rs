use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::orders::{self, OrderStatus};
use crate::models::reviews::{self, CreateReview};

/// Append a review to a completed order.
///
/// A review is only permitted against `completed`; `active` and `cancelled`
/// orders are rejected explicitly with `Conflict`. Completed is terminal, so
/// the status observed here cannot regress before the insert.
pub async fn add_review(
    db: &DatabaseConnection,
    order: &orders::Model,
    input: CreateReview,
) -> Result<reviews::Model, ApiError> {
    match order.status {
        OrderStatus::Active => {
            return Err(ApiError::Conflict(
                "order is still active and cannot be reviewed yet".to_string(),
            ));
        }
        OrderStatus::Cancelled => {
            return Err(ApiError::Conflict(
                "a cancelled order cannot receive a review".to_string(),
            ));
        }
        OrderStatus::Completed => {}
    }

    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(order.client_id),
        freelancer_id: Set(order.freelancer_id),
        order_id: Set(order.id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(chrono::Utc::now()),
    };

    let review = new_review.insert(db).await?;
    tracing::info!(order_id = %order.id, review_id = %review.id, "review recorded");
    Ok(review)
}

/// All reviews received by a freelancer.
pub async fn get_reviews_by_freelancer_id(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::FreelancerId.eq(freelancer_id))
        .all(db)
        .await
}
