use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Order status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Active)
    }
}

/// SeaORM entity for the `orders` table.
///
/// An order is created exactly once, inside the proposal-acceptance
/// transaction, and never by an external call.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub proposal_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub rate: f64,
    pub deliverable_url: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::proposals::Entity",
        from = "Column::ProposalId",
        to = "super::proposals::Column::Id"
    )]
    Proposal,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposal.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/orders/{id}/complete.
///
/// `work` is the base64-encoded deliverable; it is stored through the
/// deliverable store before any order state changes.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteOrder {
    pub work: String,
}

impl CompleteOrder {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.work.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "a deliverable is required to complete an order".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_is_the_only_non_terminal_state() {
        assert!(!OrderStatus::Active.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn empty_deliverable_is_rejected() {
        let body = CompleteOrder {
            work: String::new(),
        };
        assert_eq!(body.validate().unwrap_err().kind(), "invalid_input");
    }
}
