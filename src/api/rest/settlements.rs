use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::lifecycle::ledger::{self, SettlementLedger};
use crate::lifecycle::settlement::{self, BatchSettlement};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settlements", post(settle_batch))
        .route("/ledger", get(get_ledger))
}

#[derive(Deserialize)]
pub struct SettleBatchRequest {
    pub waybill_ids: Vec<Uuid>,
}

async fn settle_batch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettleBatchRequest>,
) -> Result<Json<BatchSettlement>, AppError> {
    if payload.waybill_ids.is_empty() {
        return Err(AppError::BadRequest("waybill_ids cannot be empty".to_string()));
    }

    let batch = settlement::collect_batch(&state, &payload.waybill_ids);

    let failed = batch.results.iter().filter(|r| !r.collected).count();
    info!(
        requested = payload.waybill_ids.len(),
        failed,
        collected_total = batch.collected_total,
        "batch settlement finished"
    );

    Ok(Json(batch))
}

async fn get_ledger(State(state): State<Arc<AppState>>) -> Json<SettlementLedger> {
    let waybills = state.waybills.iter().map(|entry| entry.value().clone());
    Json(ledger::build(waybills.collect::<Vec<_>>()))
}
