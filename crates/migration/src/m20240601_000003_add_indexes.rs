use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Samples are always read per type in insertion order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_training_data_type_created")
                    .table(TrainingData::Table)
                    .col(TrainingData::Type)
                    .col(TrainingData::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Per-label counts and progress
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_training_data_type_label")
                    .table(TrainingData::Table)
                    .col(TrainingData::Type)
                    .col(TrainingData::Label)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_training_data_type_label").table(TrainingData::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_training_data_type_created").table(TrainingData::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrainingData { Table, Type, Label, CreatedAt }
