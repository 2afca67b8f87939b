//! Create `trained_models`: at most one serialized model per gesture type.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrainedModels::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainedModels::Id))
                    .col(string_len(TrainedModels::Type, 16).not_null().unique_key())
                    .col(json_binary(TrainedModels::ModelData).not_null())
                    .col(timestamp_with_time_zone(TrainedModels::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(TrainedModels::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TrainedModels::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TrainedModels { Table, Id, Type, ModelData, CreatedAt, UpdatedAt }
