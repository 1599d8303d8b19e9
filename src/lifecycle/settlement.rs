use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::waybill::{CodStatus, Waybill, WaybillStatus};
use crate::state::AppState;

/// Marks the COD of a delivered waybill as collected into the operator's
/// custody. One-way: there is no un-collecting, and collecting before the
/// shipment is delivered is a precondition failure, not a retryable state.
pub fn collect(waybill: &mut Waybill) -> Result<(), AppError> {
    if waybill.cod_status == CodStatus::Collected {
        return Err(AppError::AlreadyCollected);
    }

    if waybill.status != WaybillStatus::Delivered {
        return Err(AppError::PrematureSettlement {
            status: waybill.status,
        });
    }

    waybill.cod_status = CodStatus::Collected;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SettlementOutcome {
    pub waybill_id: Uuid,
    pub collected: bool,
    pub amount: i64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchSettlement {
    pub results: Vec<SettlementOutcome>,
    pub collected_total: i64,
}

/// Settles a batch of waybills, one validated transition per item. Items are
/// independent: a failure is recorded against its id and the batch moves on,
/// so callers can render partial outcomes. Earlier successes are not rolled
/// back when a later item fails.
pub fn collect_batch(state: &AppState, waybill_ids: &[Uuid]) -> BatchSettlement {
    let mut results = Vec::with_capacity(waybill_ids.len());
    let mut collected_total = 0;

    for &id in waybill_ids {
        let outcome = match state.waybills.get_mut(&id) {
            Some(mut entry) => match collect(entry.value_mut()) {
                Ok(()) => {
                    let amount = entry.cod_amount;
                    collected_total += amount;
                    state
                        .metrics
                        .settlements_total
                        .with_label_values(&["success"])
                        .inc();
                    state.metrics.cod_outstanding.sub(amount);
                    info!(waybill_id = %id, amount, "cod collected");
                    SettlementOutcome {
                        waybill_id: id,
                        collected: true,
                        amount,
                        error: None,
                    }
                }
                Err(err) => {
                    state
                        .metrics
                        .settlements_total
                        .with_label_values(&["rejected"])
                        .inc();
                    warn!(waybill_id = %id, error = %err, "settlement rejected");
                    SettlementOutcome {
                        waybill_id: id,
                        collected: false,
                        amount: entry.cod_amount,
                        error: Some(err.to_string()),
                    }
                }
            },
            None => {
                state
                    .metrics
                    .settlements_total
                    .with_label_values(&["rejected"])
                    .inc();
                SettlementOutcome {
                    waybill_id: id,
                    collected: false,
                    amount: 0,
                    error: Some(format!("waybill {id} not found")),
                }
            }
        };

        results.push(outcome);
    }

    BatchSettlement {
        results,
        collected_total,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{collect, collect_batch};
    use crate::error::AppError;
    use crate::models::waybill::{CodStatus, Waybill, WaybillStatus};
    use crate::state::AppState;

    fn waybill(status: WaybillStatus, cod_amount: i64) -> Waybill {
        Waybill {
            id: Uuid::new_v4(),
            waybill_code: "WB-TEST".to_string(),
            outbound_order_id: None,
            status,
            cod_status: CodStatus::Pending,
            cod_amount,
            provider_id: None,
            vehicle_id: None,
            driver_name: None,
            vehicle_plate: None,
            customer_name: "test-customer".to_string(),
            phone: "0900000000".to_string(),
            address: "1 Test St".to_string(),
            weight_kg: None,
            shipping_fee: None,
            created_at: Utc::now(),
            delivered_at: Some(Utc::now()),
        }
    }

    #[test]
    fn collect_fails_at_every_status_except_delivered() {
        for status in [
            WaybillStatus::New,
            WaybillStatus::ReadyToPick,
            WaybillStatus::Delivering,
            WaybillStatus::Returned,
            WaybillStatus::Cancelled,
        ] {
            let mut wb = waybill(status, 100);
            let result = collect(&mut wb);

            assert!(
                matches!(result, Err(AppError::PrematureSettlement { status: s }) if s == status),
                "collection at {status:?} should be premature"
            );
            assert_eq!(wb.cod_status, CodStatus::Pending);
        }
    }

    #[test]
    fn collect_succeeds_once_delivered() {
        let mut wb = waybill(WaybillStatus::Delivered, 100);
        collect(&mut wb).unwrap();
        assert_eq!(wb.cod_status, CodStatus::Collected);
    }

    #[test]
    fn collecting_twice_is_rejected() {
        let mut wb = waybill(WaybillStatus::Delivered, 100);
        collect(&mut wb).unwrap();

        let repeat = collect(&mut wb);
        assert!(matches!(repeat, Err(AppError::AlreadyCollected)));
        assert_eq!(wb.cod_status, CodStatus::Collected);
    }

    #[test]
    fn batch_reports_each_item_independently() {
        let state = AppState::new();

        let delivered_a = waybill(WaybillStatus::Delivered, 200_000);
        let delivering = waybill(WaybillStatus::Delivering, 300_000);
        let delivered_b = waybill(WaybillStatus::Delivered, 150_000);

        let ids = [delivered_a.id, delivering.id, delivered_b.id];
        for wb in [delivered_a, delivering, delivered_b] {
            state.waybills.insert(wb.id, wb);
        }

        let batch = collect_batch(&state, &ids);

        assert_eq!(batch.results.len(), 3);
        assert!(batch.results[0].collected);
        assert!(!batch.results[1].collected);
        assert!(batch.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("Delivering"));
        assert!(batch.results[2].collected);
        assert_eq!(batch.collected_total, 350_000);

        // The two successes stick; the rejected item stays pending.
        assert_eq!(
            state.waybills.get(&ids[1]).unwrap().cod_status,
            CodStatus::Pending
        );
        assert_eq!(
            state.waybills.get(&ids[2]).unwrap().cod_status,
            CodStatus::Collected
        );
    }

    #[test]
    fn batch_reports_unknown_ids_without_aborting() {
        let state = AppState::new();
        let delivered = waybill(WaybillStatus::Delivered, 100);
        let known = delivered.id;
        let unknown = Uuid::new_v4();
        state.waybills.insert(known, delivered);

        let batch = collect_batch(&state, &[unknown, known]);

        assert!(!batch.results[0].collected);
        assert!(batch.results[0].error.as_deref().unwrap().contains("not found"));
        assert!(batch.results[1].collected);
        assert_eq!(batch.collected_total, 100);
    }
}
