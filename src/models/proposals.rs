use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Proposal status stored as a lowercase string in the database.
///
/// Write-once: `Submitted` moves to exactly one of the terminal states and
/// never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ProposalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProposalStatus::Submitted)
    }
}

/// The client's verdict on a submitted proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

/// SeaORM entity for the `proposals` table.
///
/// At most one row per (job_id, freelancer_id) — enforced by a unique index.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub cover_letter: String,
    #[sea_orm(column_type = "Double")]
    pub propose_rate: f64,
    pub status: ProposalStatus,
    pub created_at: DateTimeUtc,
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
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProposal {
    pub cover_letter: String,
    pub propose_rate: f64,
}

impl SubmitProposal {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.cover_letter.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "cover letter must not be empty".to_string(),
            ));
        }
        if self.propose_rate <= 0.0 {
            return Err(ApiError::InvalidInput(
                "proposed rate must be a positive amount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for PUT /api/proposals/{id}/decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecideProposal {
    pub decision: Decision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_is_not_terminal() {
        assert!(!ProposalStatus::Submitted.is_terminal());
        assert!(ProposalStatus::Accepted.is_terminal());
        assert!(ProposalStatus::Rejected.is_terminal());
    }

    #[test]
    fn empty_cover_letter_is_rejected() {
        let input = SubmitProposal {
            cover_letter: "   ".to_string(),
            propose_rate: 50.0,
        };
        assert_eq!(input.validate().unwrap_err().kind(), "invalid_input");
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let input = SubmitProposal {
            cover_letter: "I can do this".to_string(),
            propose_rate: -5.0,
        };
        assert_eq!(input.validate().unwrap_err().kind(), "invalid_input");
    }

    #[test]
    fn decision_deserializes_from_lowercase() {
        let body: DecideProposal = serde_json::from_str(r#"{"decision":"accepted"}"#).unwrap();
        assert_eq!(body.decision, Decision::Accepted);
        assert!(serde_json::from_str::<DecideProposal>(r#"{"decision":"maybe"}"#).is_err());
    }
}
