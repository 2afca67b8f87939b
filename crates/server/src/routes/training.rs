use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use models::SampleType;
use serde::Deserialize;
use serde_json::{json, Value};
use service::training::{CompactionReport, Diagnostics};
use tracing::info;

use crate::errors::ApiError;
use crate::routes::{ok, Envelope};
use crate::state::ServerState;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Body of `POST /api/training/save`. Fields are optional so that a missing
/// one is reported as a validation error instead of a generic decode failure.
///
/// Large uploads arrive here split into chunks: chunk 0 replaces the stored
/// rows and every later chunk is appended.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTrainingRequest {
    #[serde(rename = "type")]
    pub sample_type: Option<String>,
    pub labels: Option<Vec<String>>,
    pub features: Option<Vec<Value>>,
    #[serde(alias = "chunk")]
    pub chunk_index: Option<u64>,
    pub total_chunks: Option<u64>,
    #[serde(default)]
    pub is_chunked: bool,
}

/// Body of `POST /api/training/save-chunk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChunkRequest {
    #[serde(rename = "type")]
    pub sample_type: Option<String>,
    pub labels: Option<Vec<String>>,
    pub features: Option<Vec<Value>>,
    /// Older clients send this as `chunk`.
    #[serde(alias = "chunk")]
    pub chunk_index: Option<u64>,
    pub total_chunks: Option<u64>,
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("missing required field '{field}'")))
}

pub(crate) fn parse_type(raw: &str) -> Result<SampleType, ApiError> {
    Ok(raw.parse::<SampleType>()?)
}

fn check_chunk_bounds(chunk_index: u64, total_chunks: u64) -> Result<(), ApiError> {
    if total_chunks == 0 || chunk_index >= total_chunks {
        return Err(ApiError::Validation(format!(
            "chunkIndex {chunk_index} is outside 0..{total_chunks}"
        )));
    }
    Ok(())
}

/// Whole-dataset save. A chunked upload replaces on its first chunk and
/// appends the rest.
pub async fn save(
    State(state): State<ServerState>,
    payload: Result<Json<SaveTrainingRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(req) = payload?;
    let sample_type = parse_type(&require(req.sample_type, "type")?)?;
    let labels = require(req.labels, "labels")?;
    let features = require(req.features, "features")?;

    let chunk = if req.is_chunked || req.chunk_index.is_some() {
        let chunk_index = require(req.chunk_index, "chunkIndex")?;
        let total_chunks = require(req.total_chunks, "totalChunks")?;
        check_chunk_bounds(chunk_index, total_chunks)?;
        Some((chunk_index, total_chunks))
    } else {
        None
    };

    let count = match chunk {
        Some((chunk_index, _)) if chunk_index > 0 => {
            state.store.append_samples(sample_type, labels, features).await?
        }
        _ => state.store.replace_samples(sample_type, labels, features).await?,
    };

    let mut body = json!({
        "message": format!("saved {count} samples for {sample_type}"),
        "count": count,
    });
    if let Some((chunk_index, total_chunks)) = chunk {
        info!(event = "chunk_saved", sample_type = %sample_type, chunk_index, total_chunks, count, "chunk stored");
        body["chunkIndex"] = json!(chunk_index);
        body["totalChunks"] = json!(total_chunks);
    }
    Ok(ok(body))
}

/// Append one chunk of a larger upload.
pub async fn save_chunk(
    State(state): State<ServerState>,
    payload: Result<Json<SaveChunkRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(req) = payload?;
    let sample_type = parse_type(&require(req.sample_type, "type")?)?;
    let labels = require(req.labels, "labels")?;
    let features = require(req.features, "features")?;
    let chunk_index = require(req.chunk_index, "chunkIndex")?;
    let total_chunks = require(req.total_chunks, "totalChunks")?;
    check_chunk_bounds(chunk_index, total_chunks)?;

    let count = state.store.append_samples(sample_type, labels, features).await?;
    info!(event = "chunk_saved", sample_type = %sample_type, chunk_index, total_chunks, count, "chunk stored");
    Ok(ok(json!({
        "message": format!("chunk {} of {total_chunks} saved", chunk_index + 1),
        "count": count,
        "chunkIndex": chunk_index,
        "totalChunks": total_chunks,
    })))
}

pub async fn load(
    State(state): State<ServerState>,
    Path(sample_type): Path<String>,
) -> ApiResult<Value> {
    let sample_type = parse_type(&sample_type)?;
    let loaded = state.store.load_samples(sample_type).await?;
    Ok(ok(json!({
        "count": loaded.labels.len(),
        "labels": loaded.labels,
        "features": loaded.features,
        "timestamp": loaded.first_created_at,
        "compressed": false,
    })))
}

pub async fn count(
    State(state): State<ServerState>,
    Path(sample_type): Path<String>,
) -> ApiResult<Value> {
    let sample_type = parse_type(&sample_type)?;
    let counts = state.store.count_samples(sample_type).await?;
    Ok(ok(json!({
        "type": sample_type,
        "counts": counts.counts,
        "total": counts.total,
    })))
}

pub async fn progress(State(state): State<ServerState>) -> ApiResult<Value> {
    let progress = state.store.progress().await?;
    Ok(ok(json!({ "progress": progress })))
}

/// `reset/all` empties both tables; `reset/{type}` drops that type's samples and model.
pub async fn reset(
    State(state): State<ServerState>,
    Path(target): Path<String>,
) -> ApiResult<Value> {
    let (summary, scope) = if target == "all" {
        (state.store.reset_all().await?, "all".to_string())
    } else {
        let sample_type = parse_type(&target)?;
        (state.store.reset_type(sample_type).await?, sample_type.to_string())
    };
    Ok(ok(json!({
        "message": format!("training data reset for {scope}"),
        "samples_deleted": summary.samples_deleted,
        "models_deleted": summary.models_deleted,
    })))
}

pub async fn clear(
    State(state): State<ServerState>,
    Path(sample_type): Path<String>,
) -> ApiResult<Value> {
    let sample_type = parse_type(&sample_type)?;
    let deleted = state.store.clear_samples(sample_type).await?;
    Ok(ok(json!({
        "message": format!("cleared {deleted} samples for {sample_type}"),
        "deleted": deleted,
    })))
}

pub async fn reset_ids(State(state): State<ServerState>) -> ApiResult<Value> {
    let report = state.store.reset_ids().await?;
    Ok(ok(json!({
        "message": "id counters reset",
        "training_data_next_id": report.training_data_next_id,
        "trained_models_next_id": report.trained_models_next_id,
    })))
}

pub async fn optimize(State(state): State<ServerState>) -> ApiResult<CompactionReport> {
    Ok(ok(state.store.compact_ids().await?))
}

pub async fn diagnostics(State(state): State<ServerState>) -> ApiResult<Diagnostics> {
    Ok(ok(state.store.diagnostics().await?))
}
