use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a TEXT column stored as lowercase strings.
///
/// Every principal is exactly one of these; role decides which side of the
/// job/proposal/order lifecycle a caller may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "freelancer")]
    Freelancer,
}

/// SeaORM entity for the `users` table.
///
/// Credentials never live here — the identity provider owns those. This row is
/// only the principal's profile and role.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: Roles,
    pub display_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub hourly_rate: Option<f64>,
    pub is_banned: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jobs::Entity")]
    Jobs,
    #[sea_orm(has_many = "super::proposals::Entity")]
    Proposals,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl Related<super::proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Profile row provisioned by the identity provider (and by tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Roles,
    pub display_name: Option<String>,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Roles,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
            display_name: m.display_name,
            bio: m.bio,
            hourly_rate: m.hourly_rate,
            created_at: m.created_at,
        }
    }
}
