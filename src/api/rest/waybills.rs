use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::lifecycle::transition::{self, Carrier};
use crate::models::vehicle::VehicleStatus;
use crate::models::waybill::{CodStatus, Waybill, WaybillStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/waybills", post(create_waybill).get(list_waybills))
        .route("/waybills/:id", get(get_waybill))
        .route("/waybills/:id/stage", post(stage_waybill))
        .route("/waybills/:id/dispatch", post(dispatch_waybill))
        .route("/waybills/:id/pickup", post(pickup_waybill))
        .route("/waybills/:id/pod", post(record_pod))
        .route("/waybills/:id/cancel", post(cancel_waybill))
}

#[derive(Deserialize)]
pub struct CreateWaybillRequest {
    pub waybill_code: Option<String>,
    pub outbound_order_id: Option<Uuid>,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub cod_amount: i64,
    pub provider_id: Option<Uuid>,
    pub weight_kg: Option<u32>,
    pub shipping_fee: Option<i64>,
}

#[derive(Deserialize)]
pub struct ListWaybillsQuery {
    pub status: Option<WaybillStatus>,
    pub vehicle_plate: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct DispatchRequest {
    pub vehicle_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PodOutcome {
    Delivered,
    Returned,
}

#[derive(Deserialize)]
pub struct PodRequest {
    pub outcome: PodOutcome,
}

async fn create_waybill(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWaybillRequest>,
) -> Result<Json<Waybill>, AppError> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("customer_name cannot be empty".to_string()));
    }

    if payload.cod_amount < 0 {
        return Err(AppError::BadRequest("cod_amount cannot be negative".to_string()));
    }

    if payload.shipping_fee.is_some_and(|fee| fee < 0) {
        return Err(AppError::BadRequest("shipping_fee cannot be negative".to_string()));
    }

    if let Some(provider_id) = payload.provider_id {
        if !state.providers.contains_key(&provider_id) {
            return Err(AppError::NotFound(format!("provider {provider_id} not found")));
        }
    }

    let id = Uuid::new_v4();
    let waybill_code = match payload.waybill_code {
        Some(code) if !code.trim().is_empty() => code,
        _ => generate_code(&id),
    };

    // cod_status is stored explicitly rather than inferred from absence, so
    // every consumer reads the same value.
    let waybill = Waybill {
        id,
        waybill_code,
        outbound_order_id: payload.outbound_order_id,
        status: WaybillStatus::New,
        cod_status: CodStatus::Pending,
        cod_amount: payload.cod_amount,
        provider_id: payload.provider_id,
        vehicle_id: None,
        driver_name: None,
        vehicle_plate: None,
        customer_name: payload.customer_name,
        phone: payload.phone,
        address: payload.address,
        weight_kg: payload.weight_kg,
        shipping_fee: payload.shipping_fee,
        created_at: Utc::now(),
        delivered_at: None,
    };

    state.waybills.insert(waybill.id, waybill.clone());
    state.metrics.waybills_created_total.inc();

    info!(
        waybill_id = %waybill.id,
        waybill_code = %waybill.waybill_code,
        cod_amount = waybill.cod_amount,
        "waybill created"
    );

    Ok(Json(waybill))
}

async fn list_waybills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListWaybillsQuery>,
) -> Json<Vec<Waybill>> {
    let mut waybills: Vec<Waybill> = state
        .waybills
        .iter()
        .filter(|entry| {
            let waybill = entry.value();
            let status_matches = query.status.is_none_or(|status| waybill.status == status);
            let plate_matches = query
                .vehicle_plate
                .as_deref()
                .is_none_or(|plate| waybill.vehicle_plate.as_deref() == Some(plate));
            status_matches && plate_matches
        })
        .map(|entry| entry.value().clone())
        .collect();

    waybills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(waybills)
}

async fn get_waybill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Waybill>, AppError> {
    let waybill = state
        .waybills
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("waybill {id} not found")))?;

    Ok(Json(waybill.value().clone()))
}

async fn stage_waybill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Waybill>, AppError> {
    apply_transition(&state, id, "stage", transition::stage_for_pickup)
}

async fn dispatch_waybill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DispatchRequest>,
) -> Result<Json<Waybill>, AppError> {
    let carrier = resolve_carrier(&state, &payload).inspect_err(|_| {
        record_transition(&state, "dispatch", false);
    })?;

    let updated = apply_transition(&state, id, "dispatch", move |waybill| {
        transition::dispatch(waybill, carrier)
    })?;

    info!(
        waybill_id = %id,
        vehicle_plate = updated.vehicle_plate.as_deref().unwrap_or("-"),
        provider_id = ?updated.provider_id,
        "waybill dispatched"
    );

    Ok(updated)
}

async fn pickup_waybill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Waybill>, AppError> {
    apply_transition(&state, id, "pickup", transition::confirm_pickup)
}

async fn record_pod(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PodRequest>,
) -> Result<Json<Waybill>, AppError> {
    let updated = match payload.outcome {
        PodOutcome::Delivered => {
            let updated = apply_transition(&state, id, "deliver", transition::confirm_delivery)?;
            state.metrics.cod_outstanding.add(updated.cod_amount);
            updated
        }
        PodOutcome::Returned => apply_transition(&state, id, "return", transition::confirm_return)?,
    };

    info!(waybill_id = %id, outcome = ?payload.outcome, "proof of delivery recorded");
    Ok(updated)
}

async fn cancel_waybill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Waybill>, AppError> {
    apply_transition(&state, id, "cancel", transition::cancel)
}

/// Looks up the waybill, runs one lifecycle mutation under its entry lock,
/// and counts the attempt. Domain rejections leave the record untouched.
fn apply_transition<F>(
    state: &AppState,
    id: Uuid,
    name: &'static str,
    mutate: F,
) -> Result<Json<Waybill>, AppError>
where
    F: FnOnce(&mut Waybill) -> Result<(), AppError>,
{
    let mut entry = state
        .waybills
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("waybill {id} not found")))?;

    let result = mutate(entry.value_mut());
    record_transition(state, name, result.is_ok());
    result?;

    Ok(Json(entry.value().clone()))
}

fn record_transition(state: &AppState, name: &'static str, ok: bool) {
    let outcome = if ok { "success" } else { "rejected" };
    state
        .metrics
        .transitions_total
        .with_label_values(&[name, outcome])
        .inc();
}

fn resolve_carrier(state: &AppState, payload: &DispatchRequest) -> Result<Carrier, AppError> {
    if let Some(vehicle_id) = payload.vehicle_id {
        let vehicle = state
            .vehicles
            .get(&vehicle_id)
            .ok_or_else(|| AppError::NotFound(format!("vehicle {vehicle_id} not found")))?;

        if vehicle.status != VehicleStatus::Active {
            return Err(AppError::BadRequest(format!(
                "vehicle {} is not active",
                vehicle.plate_number
            )));
        }

        return Ok(Carrier::Vehicle {
            vehicle_id,
            driver_name: vehicle.driver_name.clone(),
            vehicle_plate: vehicle.plate_number.clone(),
        });
    }

    if let Some(provider_id) = payload.provider_id {
        if !state.providers.contains_key(&provider_id) {
            return Err(AppError::NotFound(format!("provider {provider_id} not found")));
        }
        return Ok(Carrier::Provider { provider_id });
    }

    Err(AppError::MissingAssignment)
}

fn generate_code(id: &Uuid) -> String {
    let simple = id.simple().to_string();
    format!("WB-{}", simple[..8].to_uppercase())
}
