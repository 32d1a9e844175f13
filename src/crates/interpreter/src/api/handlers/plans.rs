//! Plan execution endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::PlanResponse;
use crate::api::routes::AppState;

/// Handler for POST /execute
///
/// Body: `{"instruction": "..."}`. The instruction is sent to the model, the
/// returned plan is executed and both are returned.
pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PlanResponse>> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let instruction = body
        .get("instruction")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Invalid or missing instruction.".to_string()))?
        .to_string();

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("execute", %request_id);

    async move {
        info!(instruction_chars = instruction.len(), "Received instruction");
        let report = state.agent.run(&instruction).await?;
        Ok::<_, ApiError>(Json(PlanResponse::from(report)))
    }
    .instrument(span)
    .await
}

/// Handler for POST /plan
///
/// Body: `{"plan": ["cmd(...)", ...]}`. Runs the plan as given, without the
/// model.
pub async fn execute_plan(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PlanResponse>> {
    let Json(mut body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let plan = body
        .get_mut("plan")
        .map(Value::take)
        .ok_or_else(|| ApiError::BadRequest("Missing plan.".to_string()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("plan", %request_id);

    async move {
        let report = state.agent.run_value(plan).await?;
        Ok::<_, ApiError>(Json(PlanResponse::from(report)))
    }
    .instrument(span)
    .await
}
