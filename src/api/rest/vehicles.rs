use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vehicles", post(create_vehicle).get(list_vehicles))
        .route("/vehicles/:id/status", patch(update_vehicle_status))
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub code: String,
    pub plate_number: String,
    pub driver_name: String,
    pub brand: Option<String>,
    pub capacity_kg: u32,
}

#[derive(Deserialize)]
pub struct ListVehiclesQuery {
    pub status: Option<VehicleStatus>,
}

#[derive(Deserialize)]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    if payload.plate_number.trim().is_empty() {
        return Err(AppError::BadRequest("plate_number cannot be empty".to_string()));
    }

    if payload.driver_name.trim().is_empty() {
        return Err(AppError::BadRequest("driver_name cannot be empty".to_string()));
    }

    if payload.capacity_kg == 0 {
        return Err(AppError::BadRequest("capacity_kg must be > 0".to_string()));
    }

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        code: payload.code,
        plate_number: payload.plate_number,
        driver_name: payload.driver_name,
        brand: payload.brand,
        capacity_kg: payload.capacity_kg,
        status: VehicleStatus::Active,
        created_at: Utc::now(),
    };

    state.vehicles.insert(vehicle.id, vehicle.clone());
    Ok(Json(vehicle))
}

async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListVehiclesQuery>,
) -> Json<Vec<Vehicle>> {
    let vehicles = state
        .vehicles
        .iter()
        .filter(|entry| query.status.is_none_or(|status| entry.status == status))
        .map(|entry| entry.value().clone())
        .collect();

    Json(vehicles)
}

async fn update_vehicle_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehicleStatusRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let mut vehicle = state
        .vehicles
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {id} not found")))?;

    vehicle.status = payload.status;
    Ok(Json(vehicle.clone()))
}
