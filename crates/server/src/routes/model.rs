use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::routes::training::{parse_type, require};
use crate::routes::{ok, Envelope};
use crate::state::ServerState;

/// Body of `POST /api/model/save`.
#[derive(Debug, Deserialize)]
pub struct SaveModelRequest {
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    #[serde(alias = "model_data")]
    pub model: Option<Value>,
}

/// Insert or overwrite the trained model for a type.
pub async fn save(
    State(state): State<ServerState>,
    payload: Result<Json<SaveModelRequest>, JsonRejection>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let Json(req) = payload?;
    let model_type = parse_type(&require(req.model_type, "type")?)?;
    let model = require(req.model, "model")?;

    let stored = state.store.save_model(model_type, model).await?;
    Ok(ok(json!({
        "message": format!("model saved for {model_type}"),
        "updated_at": stored.updated_at,
    })))
}

/// Fetch the stored model. A type with no model yields `success: false` at HTTP 200.
pub async fn load(
    State(state): State<ServerState>,
    Path(model_type): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let model_type = parse_type(&model_type)?;
    let stored = state.store.load_model(model_type).await?;
    Ok(ok(json!({
        "model": stored.model,
        "updated_at": stored.updated_at,
    })))
}
