use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::sample_type::SampleType;

/// Longest label the `label` column accepts.
pub const MAX_LABEL_CHARS: usize = 5;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    pub sample_type: SampleType,
    pub label: String,
    pub features: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Labels are stored verbatim; only the column width is enforced.
pub fn validate_label(label: &str) -> Result<(), ModelError> {
    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(ModelError::Validation(format!(
            "label '{label}' exceeds {MAX_LABEL_CHARS} characters"
        )));
    }
    Ok(())
}

/// Build an insertable row; the id is left to the database.
pub fn new_sample(
    sample_type: SampleType,
    label: String,
    features: Json,
    created_at: DateTimeWithTimeZone,
) -> ActiveModel {
    ActiveModel {
        id: Default::default(),
        sample_type: Set(sample_type),
        label: Set(label),
        features: Set(features),
        created_at: Set(created_at),
    }
}
