//! Create `training_data`: one row per labeled feature vector.
//!
//! Rows are append-only; the identity column is resequenced by maintenance
//! operations, so nothing may reference it by foreign key.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrainingData::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainingData::Id))
                    .col(string_len(TrainingData::Type, 16).not_null())
                    .col(string_len(TrainingData::Label, 5).not_null())
                    .col(json_binary(TrainingData::Features).not_null())
                    .col(timestamp_with_time_zone(TrainingData::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TrainingData::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TrainingData { Table, Id, Type, Label, Features, CreatedAt }
