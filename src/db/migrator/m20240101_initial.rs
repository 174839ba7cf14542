use crate::entities::prelude::*;
use crate::entities::loan_applications;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(LoanApplications)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Settings)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Owner-scoped listings
        manager
            .create_index(
                Index::create()
                    .name("idx_loan_applications_user_id")
                    .table(LoanApplications)
                    .col(loan_applications::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loan_applications_status")
                    .table(LoanApplications)
                    .col(loan_applications::Column::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loan_applications_applied_at")
                    .table(LoanApplications)
                    .col(loan_applications::Column::AppliedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoanApplications).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Settings).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await
    }
}
