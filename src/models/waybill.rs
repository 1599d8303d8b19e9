use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaybillStatus {
    New,
    ReadyToPick,
    Delivering,
    Delivered,
    Returned,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodStatus {
    Pending,
    Collected,
}

/// One shipment contracted to a carrier, tracked through dispatch and
/// delivery. `cod_amount` is in minor currency units and is fixed at
/// creation; settlement only ever flips `cod_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waybill {
    pub id: Uuid,
    pub waybill_code: String,
    pub outbound_order_id: Option<Uuid>,
    pub status: WaybillStatus,
    pub cod_status: CodStatus,
    pub cod_amount: i64,
    pub provider_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub vehicle_plate: Option<String>,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub weight_kg: Option<u32>,
    pub shipping_fee: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}
