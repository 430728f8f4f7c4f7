use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `proposals` table and its columns.
#[derive(DeriveIden)]
enum Proposals {
    Table,
    Id,
    JobId,
    FreelancerId,
    CoverLetter,
    ProposeRate,
    Status,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proposals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Proposals::JobId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::FreelancerId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::CoverLetter).text().not_null())
                    .col(ColumnDef::new(Proposals::ProposeRate).double().not_null())
                    .col(ColumnDef::new(Proposals::Status).string().not_null())
                    .col(
                        ColumnDef::new(Proposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_job_id")
                            .from(Proposals::Table, Proposals::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_freelancer_id")
                            .from(Proposals::Table, Proposals::FreelancerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One proposal per (job, freelancer); the insert path relies on this
        // to serialize concurrent duplicate submissions.
        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_job_freelancer_unique")
                    .table(Proposals::Table)
                    .col(Proposals::JobId)
                    .col(Proposals::FreelancerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_proposals_job_freelancer_unique")
                    .table(Proposals::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Proposals::Table).to_owned())
            .await
    }
}
