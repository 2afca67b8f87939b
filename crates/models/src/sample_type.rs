//! Gesture categories. Each category owns a fixed label set used for progress.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    #[sea_orm(string_value = "alphabet")]
    Alphabet,
    #[sea_orm(string_value = "numbers")]
    Numbers,
}

impl SampleType {
    pub const ALL: [SampleType; 2] = [SampleType::Alphabet, SampleType::Numbers];

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::Alphabet => "alphabet",
            SampleType::Numbers => "numbers",
        }
    }

    /// Size of the label set that counts toward training progress.
    pub fn label_total(&self) -> usize {
        match self {
            SampleType::Alphabet => 26,
            SampleType::Numbers => 10,
        }
    }

    /// `A`..=`Z` for the alphabet, `0`..=`9` for numbers. Anything else can be
    /// stored but never counts toward progress.
    pub fn is_valid_label(&self, label: &str) -> bool {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => match self {
                SampleType::Alphabet => c.is_ascii_uppercase(),
                SampleType::Numbers => c.is_ascii_digit(),
            },
            _ => false,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabet" => Ok(SampleType::Alphabet),
            "numbers" => Ok(SampleType::Numbers),
            other => Err(ModelError::Validation(format!(
                "invalid type '{other}', expected 'alphabet' or 'numbers'"
            ))),
        }
    }
}
