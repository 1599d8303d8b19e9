use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::waybill::{Waybill, WaybillStatus};

/// Carrier identity stamped onto a waybill when it leaves for delivery.
/// Either an in-house vehicle with its driver, or a third-party provider.
#[derive(Debug, Clone)]
pub enum Carrier {
    Vehicle {
        vehicle_id: Uuid,
        driver_name: String,
        vehicle_plate: String,
    },
    Provider {
        provider_id: Uuid,
    },
}

/// Decides whether `requested` is reachable from `current` in one step.
///
/// The status axis is monotonic: the only way out of `Delivering` is
/// `Delivered` or `Returned`, and nothing leaves a terminal state. Repeating
/// a transition the waybill already took is rejected, not treated as a no-op.
pub fn validate_transition(
    current: WaybillStatus,
    requested: WaybillStatus,
) -> Result<(), AppError> {
    use WaybillStatus::*;

    let legal = matches!(
        (current, requested),
        (New, ReadyToPick)
            | (New, Delivering)
            | (ReadyToPick, Delivering)
            | (Delivering, Delivered)
            | (Delivering, Returned)
            | (New, Cancelled)
            | (ReadyToPick, Cancelled)
    );

    if legal {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            from: current,
            to: requested,
        })
    }
}

/// Warehouse stages the shipment for pickup.
pub fn stage_for_pickup(waybill: &mut Waybill) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::ReadyToPick)?;
    waybill.status = WaybillStatus::ReadyToPick;
    Ok(())
}

/// Dispatcher assigns the waybill to a carrier and sends it out. The carrier
/// fields are stamped atomically with the status change; a vehicle carrier
/// without a driver or plate is rejected before anything is mutated.
pub fn dispatch(waybill: &mut Waybill, carrier: Carrier) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::Delivering)?;

    match carrier {
        Carrier::Vehicle {
            vehicle_id,
            driver_name,
            vehicle_plate,
        } => {
            if driver_name.trim().is_empty() || vehicle_plate.trim().is_empty() {
                return Err(AppError::MissingAssignment);
            }
            waybill.vehicle_id = Some(vehicle_id);
            waybill.driver_name = Some(driver_name);
            waybill.vehicle_plate = Some(vehicle_plate);
        }
        Carrier::Provider { provider_id } => {
            waybill.provider_id = Some(provider_id);
        }
    }

    waybill.status = WaybillStatus::Delivering;
    Ok(())
}

/// Driver confirms pickup of an already-assigned waybill. Unlike `dispatch`
/// this stamps no carrier, so one must already be on the record.
pub fn confirm_pickup(waybill: &mut Waybill) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::Delivering)?;

    let has_carrier = waybill.provider_id.is_some()
        || (waybill.vehicle_id.is_some()
            && waybill.driver_name.is_some()
            && waybill.vehicle_plate.is_some());
    if !has_carrier {
        return Err(AppError::MissingAssignment);
    }

    waybill.status = WaybillStatus::Delivering;
    Ok(())
}

/// Driver confirms successful delivery. Stamps `delivered_at`; the COD
/// sub-state stays `Pending` until reconciliation collects it.
pub fn confirm_delivery(waybill: &mut Waybill) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::Delivered)?;
    waybill.status = WaybillStatus::Delivered;
    waybill.delivered_at = Some(Utc::now());
    Ok(())
}

/// Driver reports a failed delivery; the shipment comes back to the warehouse.
pub fn confirm_return(waybill: &mut Waybill) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::Returned)?;
    waybill.status = WaybillStatus::Returned;
    Ok(())
}

/// Administrative cancellation, only while no carrier has the shipment.
pub fn cancel(waybill: &mut Waybill) -> Result<(), AppError> {
    validate_transition(waybill.status, WaybillStatus::Cancelled)?;
    waybill.status = WaybillStatus::Cancelled;
    Ok(())
}
