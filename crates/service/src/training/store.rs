use std::collections::BTreeMap;

use chrono::Utc;
use configs::DatabaseConfig;
use models::{trained_model, training_sample, SampleType};
use sea_orm::prelude::{DateTimeWithTimeZone, Json};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{info, instrument};

use super::maintenance::{self, Table};
use super::types::{
    CompactionReport, Diagnostics, IdResetReport, LabelCounts, LoadedSamples, ProgressReport, ResetSummary,
    StoredModel, TableDiagnostics, TypeProgress,
};
use crate::errors::ServiceError;

/// Rows per INSERT statement; keeps large uploads under bind-parameter limits.
const INSERT_BATCH: usize = 500;

/// How a sample upload treats rows already stored for its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Delete every row of the type, then insert the upload.
    Replace,
    /// Insert the upload next to what is already there.
    Append,
}

/// Sample & model store over a pooled connection.
///
/// Every operation borrows connections from the pool for its own duration.
/// Multi-statement operations run in one transaction that rolls back if
/// dropped early. Callers must not run `compact_ids`, `clear_samples` or the
/// reset operations concurrently with saves for the same type.
#[derive(Clone)]
pub struct TrainingStore {
    db: DatabaseConnection,
}

impl TrainingStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Build the pool from an explicit configuration.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ServiceError> {
        let db = models::db::connect_with_config(cfg).await?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }

    /// Store `(labels[i], features[i])` pairs for the shortest of the two
    /// sequences. Returns the number of rows inserted.
    #[instrument(skip(self, labels, features), fields(sample_type = %sample_type))]
    pub async fn save_samples(
        &self,
        sample_type: SampleType,
        labels: Vec<String>,
        features: Vec<Json>,
        mode: SaveMode,
    ) -> Result<usize, ServiceError> {
        let pairs: Vec<(String, Json)> = labels.into_iter().zip(features).collect();
        for (label, _) in &pairs {
            training_sample::validate_label(label)?;
        }

        let created_at: DateTimeWithTimeZone = Utc::now().into();
        let inserted = pairs.len();
        let txn = self.db.begin().await?;
        let mut deleted = 0;
        if mode == SaveMode::Replace {
            deleted = training_sample::Entity::delete_many()
                .filter(training_sample::Column::SampleType.eq(sample_type))
                .exec(&txn)
                .await?
                .rows_affected;
        }

        let mut rows = pairs
            .into_iter()
            .map(|(label, features)| training_sample::new_sample(sample_type, label, features, created_at))
            .peekable();
        while rows.peek().is_some() {
            let batch: Vec<_> = rows.by_ref().take(INSERT_BATCH).collect();
            training_sample::Entity::insert_many(batch).exec_without_returning(&txn).await?;
        }
        txn.commit().await?;

        if mode == SaveMode::Replace {
            maintenance::restart_identity_if_empty(&self.db, Table::TrainingData).await?;
        }
        info!(event = "samples_saved", ?mode, deleted, inserted, "training samples stored");
        Ok(inserted)
    }

    /// Whole-dataset save: previous rows of the type are discarded.
    pub async fn replace_samples(
        &self,
        sample_type: SampleType,
        labels: Vec<String>,
        features: Vec<Json>,
    ) -> Result<usize, ServiceError> {
        self.save_samples(sample_type, labels, features, SaveMode::Replace).await
    }

    /// Incremental/chunked save.
    pub async fn append_samples(
        &self,
        sample_type: SampleType,
        labels: Vec<String>,
        features: Vec<Json>,
    ) -> Result<usize, ServiceError> {
        self.save_samples(sample_type, labels, features, SaveMode::Append).await
    }

    /// All samples of a type, oldest first.
    pub async fn load_samples(&self, sample_type: SampleType) -> Result<LoadedSamples, ServiceError> {
        let rows = training_sample::Entity::find()
            .filter(training_sample::Column::SampleType.eq(sample_type))
            .order_by_asc(training_sample::Column::CreatedAt)
            .order_by_asc(training_sample::Column::Id)
            .all(&self.db)
            .await?;

        let mut loaded = LoadedSamples {
            first_created_at: rows.first().map(|r| r.created_at),
            labels: Vec::with_capacity(rows.len()),
            features: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            loaded.labels.push(row.label);
            loaded.features.push(row.features);
        }
        Ok(loaded)
    }

    pub async fn count_samples(&self, sample_type: SampleType) -> Result<LabelCounts, ServiceError> {
        let per_label: Vec<(String, i64)> = training_sample::Entity::find()
            .select_only()
            .column(training_sample::Column::Label)
            .column_as(Expr::col(training_sample::Column::Id).count(), "samples")
            .filter(training_sample::Column::SampleType.eq(sample_type))
            .group_by(training_sample::Column::Label)
            .order_by_asc(training_sample::Column::Label)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut counts = LabelCounts::default();
        for (label, n) in per_label {
            let n = n.max(0) as u64;
            counts.total += n;
            counts.counts.insert(label, n);
        }
        Ok(counts)
    }

    /// Delete one type's samples; the id counter restarts at 1 if the table
    /// ends up empty.
    pub async fn clear_samples(&self, sample_type: SampleType) -> Result<u64, ServiceError> {
        let deleted = training_sample::Entity::delete_many()
            .filter(training_sample::Column::SampleType.eq(sample_type))
            .exec(&self.db)
            .await?
            .rows_affected;
        maintenance::restart_identity_if_empty(&self.db, Table::TrainingData).await?;
        info!(event = "samples_cleared", sample_type = %sample_type, deleted, "training samples cleared");
        Ok(deleted)
    }

    /// Delete one type's samples and its trained model.
    pub async fn reset_type(&self, sample_type: SampleType) -> Result<ResetSummary, ServiceError> {
        let txn = self.db.begin().await?;
        let samples_deleted = training_sample::Entity::delete_many()
            .filter(training_sample::Column::SampleType.eq(sample_type))
            .exec(&txn)
            .await?
            .rows_affected;
        let models_deleted = trained_model::Entity::delete_many()
            .filter(trained_model::Column::ModelType.eq(sample_type))
            .exec(&txn)
            .await?
            .rows_affected;
        txn.commit().await?;

        for table in Table::ALL {
            maintenance::restart_identity_if_empty(&self.db, table).await?;
        }
        info!(event = "type_reset", sample_type = %sample_type, samples_deleted, models_deleted, "type reset");
        Ok(ResetSummary { samples_deleted, models_deleted })
    }

    /// Empty both tables and restart both id counters at 1.
    pub async fn reset_all(&self) -> Result<ResetSummary, ServiceError> {
        let txn = self.db.begin().await?;
        let samples_deleted = training_sample::Entity::delete_many().exec(&txn).await?.rows_affected;
        let models_deleted = trained_model::Entity::delete_many().exec(&txn).await?.rows_affected;
        txn.commit().await?;

        for table in Table::ALL {
            maintenance::restart_identity_if_empty(&self.db, table).await?;
        }
        info!(event = "all_reset", samples_deleted, models_deleted, "all training data reset");
        Ok(ResetSummary { samples_deleted, models_deleted })
    }

    /// Point both id counters at `max(id) + 1` without touching rows.
    pub async fn reset_ids(&self) -> Result<IdResetReport, ServiceError> {
        for table in Table::ALL {
            maintenance::restart_identity(&self.db, table).await?;
        }
        let report = IdResetReport {
            training_data_next_id: maintenance::next_id(&self.db, Table::TrainingData).await?,
            trained_models_next_id: maintenance::next_id(&self.db, Table::TrainedModels).await?,
        };
        info!(
            event = "ids_reset",
            training_data_next_id = report.training_data_next_id,
            trained_models_next_id = report.trained_models_next_id,
            "id counters reset"
        );
        Ok(report)
    }

    /// Renumber samples 1..=n in `(created_at, type, label)` order.
    pub async fn compact_ids(&self) -> Result<CompactionReport, ServiceError> {
        let before = maintenance::id_stats(&self.db, Table::TrainingData).await?;
        let txn = self.db.begin().await?;
        maintenance::compact_training_data(&txn).await?;
        txn.commit().await?;
        let after = maintenance::id_stats(&self.db, Table::TrainingData).await?;

        let report = CompactionReport { before, after, ids_are_sequential: after.is_sequential() };
        info!(
            event = "ids_compacted",
            rows = after.count,
            before_max = ?before.max_id,
            after_max = ?after.max_id,
            sequential = report.ids_are_sequential,
            "training ids compacted"
        );
        Ok(report)
    }

    /// Distinct valid labels per type against the fixed label totals.
    pub async fn progress(&self) -> Result<ProgressReport, ServiceError> {
        Ok(ProgressReport {
            alphabet: self.type_progress(SampleType::Alphabet).await?,
            numbers: self.type_progress(SampleType::Numbers).await?,
        })
    }

    async fn type_progress(&self, sample_type: SampleType) -> Result<TypeProgress, ServiceError> {
        let labels: Vec<String> = training_sample::Entity::find()
            .select_only()
            .column(training_sample::Column::Label)
            .filter(training_sample::Column::SampleType.eq(sample_type))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        let trained = labels.iter().filter(|l| sample_type.is_valid_label(l)).count();
        Ok(TypeProgress::new(trained, sample_type.label_total()))
    }

    /// Insert or overwrite the model for a type. Returns the stored row.
    #[instrument(skip(self, model_data), fields(model_type = %model_type))]
    pub async fn save_model(&self, model_type: SampleType, model_data: Json) -> Result<StoredModel, ServiceError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let am = trained_model::ActiveModel {
            model_type: sea_orm::Set(model_type),
            model_data: sea_orm::Set(model_data),
            created_at: sea_orm::Set(now),
            updated_at: sea_orm::Set(now),
            ..Default::default()
        };
        trained_model::Entity::insert(am)
            .on_conflict(
                OnConflict::column(trained_model::Column::ModelType)
                    .update_columns([trained_model::Column::ModelData, trained_model::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        let stored = self.load_model(model_type).await?;
        info!(event = "model_saved", updated_at = %stored.updated_at, "trained model stored");
        Ok(stored)
    }

    /// The saved model for a type, or `NotFound` if none was saved yet.
    pub async fn load_model(&self, model_type: SampleType) -> Result<StoredModel, ServiceError> {
        let row = trained_model::Entity::find()
            .filter(trained_model::Column::ModelType.eq(model_type))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("trained model for '{model_type}'")))?;
        Ok(StoredModel { model: row.model_data, updated_at: row.updated_at })
    }

    /// Read-only view of both tables' identity columns and row counts.
    pub async fn diagnostics(&self) -> Result<Diagnostics, ServiceError> {
        let training_data = TableDiagnostics {
            ids: maintenance::id_stats(&self.db, Table::TrainingData).await?,
            next_id: maintenance::next_id(&self.db, Table::TrainingData).await?,
        };
        let trained_models = TableDiagnostics {
            ids: maintenance::id_stats(&self.db, Table::TrainedModels).await?,
            next_id: maintenance::next_id(&self.db, Table::TrainedModels).await?,
        };

        let mut samples_by_type = BTreeMap::new();
        for sample_type in SampleType::ALL {
            let n = training_sample::Entity::find()
                .filter(training_sample::Column::SampleType.eq(sample_type))
                .count(&self.db)
                .await?;
            samples_by_type.insert(sample_type.to_string(), n);
        }

        Ok(Diagnostics {
            has_gaps: !training_data.ids.is_sequential(),
            training_data,
            trained_models,
            samples_by_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_store;
    use serde_json::json;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn vectors(n: usize) -> Vec<Json> {
        (0..n).map(|i| json!([i as f64, i as f64 * 0.5, 1.0])).collect()
    }

    async fn sample_ids(store: &TrainingStore) -> anyhow::Result<Vec<(i32, String)>> {
        let rows = training_sample::Entity::find()
            .order_by_asc(training_sample::Column::Id)
            .all(store.connection())
            .await?;
        Ok(rows.into_iter().map(|r| (r.id, r.label)).collect())
    }

    #[tokio::test]
    async fn append_then_load_returns_pairs_in_order() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let l = labels(&["C", "A", "B", "A"]);
        let f = vectors(4);

        let n = store.append_samples(SampleType::Alphabet, l.clone(), f.clone()).await?;
        assert_eq!(n, 4);

        let loaded = store.load_samples(SampleType::Alphabet).await?;
        assert_eq!(loaded.labels, l);
        assert_eq!(loaded.features, f);
        assert!(loaded.first_created_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn chunked_appends_accumulate() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Numbers, labels(&["1", "2"]), vectors(2)).await?;
        store.append_samples(SampleType::Numbers, labels(&["3"]), vectors(1)).await?;

        let loaded = store.load_samples(SampleType::Numbers).await?;
        assert_eq!(loaded.labels, labels(&["1", "2", "3"]));
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_lengths_use_shorter_sequence() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let n = store.append_samples(SampleType::Alphabet, labels(&["A", "B", "C"]), vectors(2)).await?;
        assert_eq!(n, 2);
        let n = store.append_samples(SampleType::Alphabet, labels(&["D"]), vectors(5)).await?;
        assert_eq!(n, 1);
        assert_eq!(store.load_samples(SampleType::Alphabet).await?.labels, labels(&["A", "B", "D"]));
        Ok(())
    }

    #[tokio::test]
    async fn large_upload_spans_insert_batches() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let count = INSERT_BATCH * 2 + 7;
        let l: Vec<String> = (0..count).map(|i| ((b'A' + (i % 26) as u8) as char).to_string()).collect();
        let n = store.append_samples(SampleType::Alphabet, l.clone(), vectors(count)).await?;
        assert_eq!(n, count);
        let loaded = store.load_samples(SampleType::Alphabet).await?;
        assert_eq!(loaded.labels, l);
        Ok(())
    }

    #[tokio::test]
    async fn replace_discards_previous_rows_of_type_only() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B"]), vectors(2)).await?;
        store.append_samples(SampleType::Numbers, labels(&["1"]), vectors(1)).await?;

        store.replace_samples(SampleType::Alphabet, labels(&["Z"]), vec![json!([9.0])]).await?;

        let alpha = store.load_samples(SampleType::Alphabet).await?;
        assert_eq!(alpha.labels, labels(&["Z"]));
        assert_eq!(alpha.features, vec![json!([9.0])]);
        assert_eq!(store.load_samples(SampleType::Numbers).await?.labels, labels(&["1"]));
        Ok(())
    }

    #[tokio::test]
    async fn replace_on_sole_type_restarts_ids() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B", "C"]), vectors(3)).await?;
        store.replace_samples(SampleType::Alphabet, vec![], vec![]).await?;
        store.append_samples(SampleType::Alphabet, labels(&["D"]), vectors(1)).await?;
        assert_eq!(sample_ids(&store).await?, vec![(1, "D".to_string())]);
        Ok(())
    }

    #[tokio::test]
    async fn overlong_label_rejected_before_insert() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let err = store
            .append_samples(SampleType::Alphabet, labels(&["A", "TOOLONG"]), vectors(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Model(models::errors::ModelError::Validation(_))));
        assert!(store.load_samples(SampleType::Alphabet).await?.labels.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn blank_label_is_stored_but_not_progress() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let n = store.append_samples(SampleType::Alphabet, labels(&["A", "", " "]), vectors(3)).await?;
        assert_eq!(n, 3);
        assert_eq!(store.load_samples(SampleType::Alphabet).await?.labels, labels(&["A", "", " "]));

        let progress = store.progress().await?;
        assert_eq!(progress.alphabet.trained, 1);
        Ok(())
    }

    #[tokio::test]
    async fn load_empty_type_is_not_an_error() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let loaded = store.load_samples(SampleType::Numbers).await?;
        assert!(loaded.labels.is_empty());
        assert!(loaded.features.is_empty());
        assert!(loaded.first_created_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn counts_per_label_and_total() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B", "A", "A"]), vectors(4)).await?;
        store.append_samples(SampleType::Numbers, labels(&["1"]), vectors(1)).await?;

        let counts = store.count_samples(SampleType::Alphabet).await?;
        assert_eq!(counts.total, 4);
        assert_eq!(counts.counts.get("A"), Some(&3));
        assert_eq!(counts.counts.get("B"), Some(&1));
        assert_eq!(counts.counts.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn progress_counts_distinct_valid_labels() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store
            .append_samples(SampleType::Alphabet, labels(&["A", "B", "C", "A", "hi", "a"]), vectors(6))
            .await?;
        store.append_samples(SampleType::Numbers, labels(&["0", "0", "X"]), vectors(3)).await?;

        let progress = store.progress().await?;
        assert_eq!(progress.alphabet, TypeProgress { trained: 3, total: 26, percentage: 12 });
        assert_eq!(progress.numbers, TypeProgress { trained: 1, total: 10, percentage: 10 });
        Ok(())
    }

    #[tokio::test]
    async fn clear_removes_one_type() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A"]), vectors(1)).await?;
        store.append_samples(SampleType::Numbers, labels(&["1", "2"]), vectors(2)).await?;

        assert_eq!(store.clear_samples(SampleType::Numbers).await?, 2);
        assert!(store.load_samples(SampleType::Numbers).await?.labels.is_empty());
        assert_eq!(store.load_samples(SampleType::Alphabet).await?.labels, labels(&["A"]));
        Ok(())
    }

    #[tokio::test]
    async fn save_model_twice_keeps_latest() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let first = store.save_model(SampleType::Alphabet, json!({"weights": [1, 2]})).await?;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.save_model(SampleType::Alphabet, json!({"weights": [3, 4]})).await?;

        assert!(second.updated_at > first.updated_at);
        assert_eq!(trained_model::Entity::find().count(store.connection()).await?, 1);
        let loaded = store.load_model(SampleType::Alphabet).await?;
        assert_eq!(loaded.model, json!({"weights": [3, 4]}));
        assert_eq!(loaded.updated_at, second.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn load_missing_model_is_not_found() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.save_model(SampleType::Alphabet, json!({})).await?;
        let err = store.load_model(SampleType::Numbers).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn reset_all_restarts_ids_at_one() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B"]), vectors(2)).await?;
        store.save_model(SampleType::Alphabet, json!({"v": 1})).await?;
        store.save_model(SampleType::Numbers, json!({"v": 1})).await?;

        let summary = store.reset_all().await?;
        assert_eq!(summary, ResetSummary { samples_deleted: 2, models_deleted: 2 });

        store.append_samples(SampleType::Numbers, labels(&["5"]), vectors(1)).await?;
        store.save_model(SampleType::Numbers, json!({"v": 2})).await?;
        assert_eq!(sample_ids(&store).await?, vec![(1, "5".to_string())]);
        let model = trained_model::Entity::find().one(store.connection()).await?.expect("model row");
        assert_eq!(model.id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn reset_type_drops_samples_and_model() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A"]), vectors(1)).await?;
        store.append_samples(SampleType::Numbers, labels(&["1"]), vectors(1)).await?;
        store.save_model(SampleType::Alphabet, json!({"v": 1})).await?;
        store.save_model(SampleType::Numbers, json!({"v": 1})).await?;

        let summary = store.reset_type(SampleType::Alphabet).await?;
        assert_eq!(summary, ResetSummary { samples_deleted: 1, models_deleted: 1 });
        assert!(matches!(store.load_model(SampleType::Alphabet).await, Err(ServiceError::NotFound(_))));
        assert!(store.load_model(SampleType::Numbers).await.is_ok());
        assert_eq!(store.load_samples(SampleType::Numbers).await?.labels, labels(&["1"]));
        Ok(())
    }

    #[tokio::test]
    async fn compaction_renumbers_in_original_order() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        let l = labels(&["A", "B", "C", "D", "E", "F", "G", "H", "I"]);
        store.append_samples(SampleType::Alphabet, l, vectors(9)).await?;
        // keep ids 2, 5 and 9
        training_sample::Entity::delete_many()
            .filter(training_sample::Column::Id.is_not_in([2, 5, 9]))
            .exec(store.connection())
            .await?;

        let report = store.compact_ids().await?;
        assert_eq!(report.before.min_id, Some(2));
        assert_eq!(report.before.max_id, Some(9));
        assert!(!report.before.is_sequential());
        assert_eq!(report.after.min_id, Some(1));
        assert_eq!(report.after.max_id, Some(3));
        assert_eq!(report.after.count, 3);
        assert!(report.ids_are_sequential);

        assert_eq!(
            sample_ids(&store).await?,
            vec![(1, "B".to_string()), (2, "E".to_string()), (3, "I".to_string())]
        );
        store.append_samples(SampleType::Alphabet, labels(&["J"]), vectors(1)).await?;
        assert_eq!(sample_ids(&store).await?.last(), Some(&(4, "J".to_string())));
        Ok(())
    }

    #[tokio::test]
    async fn reset_ids_keeps_rows() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B", "C"]), vectors(3)).await?;
        training_sample::Entity::delete_many()
            .filter(training_sample::Column::Id.eq(3))
            .exec(store.connection())
            .await?;

        let report = store.reset_ids().await?;
        assert_eq!(report.training_data_next_id, 3);
        assert_eq!(report.trained_models_next_id, 1);
        assert_eq!(store.load_samples(SampleType::Alphabet).await?.labels, labels(&["A", "B"]));
        Ok(())
    }

    #[tokio::test]
    async fn diagnostics_reports_gaps_without_mutating() -> anyhow::Result<()> {
        let (store, _db_file) = get_store().await?;
        store.append_samples(SampleType::Alphabet, labels(&["A", "B", "C"]), vectors(3)).await?;
        store.append_samples(SampleType::Numbers, labels(&["1"]), vectors(1)).await?;
        store.save_model(SampleType::Numbers, json!({"v": 1})).await?;
        training_sample::Entity::delete_many()
            .filter(training_sample::Column::Id.eq(2))
            .exec(store.connection())
            .await?;

        let diag = store.diagnostics().await?;
        assert_eq!(diag.training_data.ids.min_id, Some(1));
        assert_eq!(diag.training_data.ids.max_id, Some(4));
        assert_eq!(diag.training_data.ids.count, 3);
        assert_eq!(diag.training_data.next_id, 5);
        assert_eq!(diag.trained_models.ids.count, 1);
        assert_eq!(diag.trained_models.next_id, 2);
        assert_eq!(diag.samples_by_type.get("alphabet"), Some(&2));
        assert_eq!(diag.samples_by_type.get("numbers"), Some(&1));
        assert!(diag.has_gaps);

        let again = store.diagnostics().await?;
        assert_eq!(again, diag);
        Ok(())
    }
}
