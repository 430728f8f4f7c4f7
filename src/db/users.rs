use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, CreateUser};

/// Insert a profile row for a principal provisioned by the identity provider.
pub async fn insert_user(db: &DatabaseConnection, input: CreateUser) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(input.id),
        username: Set(input.username),
        email: Set(input.email),
        role: Set(input.role),
        display_name: Set(input.display_name),
        bio: Set(None),
        hourly_rate: Set(None),
        is_banned: Set(false),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}
