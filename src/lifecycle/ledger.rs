use serde::Serialize;

use crate::models::waybill::{CodStatus, Waybill, WaybillStatus};

/// Reconciliation snapshot over the delivered waybills: what the drivers
/// still hold versus what has been collected into the operator's custody.
#[derive(Debug, Serialize)]
pub struct SettlementLedger {
    pub outstanding_total: i64,
    pub collected_total: i64,
    pub outstanding: Vec<Waybill>,
    pub collected: Vec<Waybill>,
}

/// Pure aggregation, no mutation. Only `Delivered` waybills participate;
/// each group is ordered by `created_at` descending so "most recent" does
/// not depend on the order of the underlying collection.
pub fn build(waybills: impl IntoIterator<Item = Waybill>) -> SettlementLedger {
    let mut outstanding = Vec::new();
    let mut collected = Vec::new();

    for waybill in waybills {
        if waybill.status != WaybillStatus::Delivered {
            continue;
        }
        match waybill.cod_status {
            CodStatus::Pending => outstanding.push(waybill),
            CodStatus::Collected => collected.push(waybill),
        }
    }

    outstanding.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    collected.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let outstanding_total = outstanding.iter().map(|w| w.cod_amount).sum();
    let collected_total = collected.iter().map(|w| w.cod_amount).sum();

    SettlementLedger {
        outstanding_total,
        collected_total,
        outstanding,
        collected,
    }
}
