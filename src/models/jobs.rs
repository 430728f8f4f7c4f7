use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Job status stored as a lowercase string in the database.
///
/// `Open` is the only non-terminal state a client creates; the proposal and
/// order managers drive the rest: acceptance moves a job to `InProgress`,
/// order completion to `Complete`, order cancellation to `Close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "inprogress")]
    InProgress,
    #[sea_orm(string_value = "complete")]
    Complete,
    #[sea_orm(string_value = "close")]
    Close,
}

/// SeaORM entity for the `jobs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub budget: f64,
    pub deadline: Option<DateTimeUtc>,
    pub status: JobStatus,
    pub client_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::proposals::Entity")]
    Proposals,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
}

impl Related<super::proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

pub const MIN_TITLE_LEN: usize = 10;
pub const MIN_DESCRIPTION_LEN: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub deadline: Option<DateTimeUtc>,
}

impl CreateJob {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().len() < MIN_TITLE_LEN {
            return Err(ApiError::InvalidInput(format!(
                "title must be at least {MIN_TITLE_LEN} characters"
            )));
        }
        if self.description.trim().len() < MIN_DESCRIPTION_LEN {
            return Err(ApiError::InvalidInput(format!(
                "description must be at least {MIN_DESCRIPTION_LEN} characters"
            )));
        }
        if self.budget <= 0.0 {
            return Err(ApiError::InvalidInput(
                "budget must be a positive amount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update: only supplied fields are touched. Status values are already
/// restricted to the enum by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<DateTimeUtc>,
    pub status: Option<JobStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateJob {
        CreateJob {
            title: "Build a landing page".to_string(),
            description: "We need a responsive landing page with a contact form \
                          and basic analytics wired up."
                .to_string(),
            budget: 500.0,
            deadline: None,
        }
    }

    #[test]
    fn valid_job_passes_validation() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn short_title_is_rejected() {
        let mut job = valid_create();
        job.title = "short".to_string();
        let err = job.validate().unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn short_description_is_rejected() {
        let mut job = valid_create();
        job.description = "too short".to_string();
        assert_eq!(job.validate().unwrap_err().kind(), "invalid_input");
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let mut job = valid_create();
        job.budget = 0.0;
        assert_eq!(job.validate().unwrap_err().kind(), "invalid_input");
    }
}
