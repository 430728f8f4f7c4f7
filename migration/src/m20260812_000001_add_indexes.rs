use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Jobs {
    Table,
    ClientId,
}

#[derive(DeriveIden)]
enum Proposals {
    Table,
    JobId,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    ClientId,
    FreelancerId,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    FreelancerId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on jobs.client_id for listing a client's own jobs
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_client_id")
                    .table(Jobs::Table)
                    .col(Jobs::ClientId)
                    .to_owned(),
            )
            .await?;

        // Index on proposals.job_id for listing proposals per job
        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_job_id")
                    .table(Proposals::Table)
                    .col(Proposals::JobId)
                    .to_owned(),
            )
            .await?;

        // Indexes on orders for the role-selected listing
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_client_id")
                    .table(Orders::Table)
                    .col(Orders::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_freelancer_id")
                    .table(Orders::Table)
                    .col(Orders::FreelancerId)
                    .to_owned(),
            )
            .await?;

        // Index on reviews.freelancer_id for the public review listing
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_freelancer_id")
                    .table(Reviews::Table)
                    .col(Reviews::FreelancerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_jobs_client_id")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_proposals_job_id")
                    .table(Proposals::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_client_id")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_freelancer_id")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reviews_freelancer_id")
                    .table(Reviews::Table)
                    .to_owned(),
            )
            .await
    }
}
