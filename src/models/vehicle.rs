use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub code: String,
    pub plate_number: String,
    pub driver_name: String,
    pub brand: Option<String>,
    pub capacity_kg: u32,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}
