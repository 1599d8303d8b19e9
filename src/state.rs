use dashmap::DashMap;
use uuid::Uuid;

use crate::models::provider::Provider;
use crate::models::vehicle::Vehicle;
use crate::models::waybill::Waybill;
use crate::observability::metrics::Metrics;

/// In-memory repository shared across handlers. Reads hand out fresh
/// snapshots; each single-waybill mutation holds that entry's lock, so two
/// actors racing on the same waybill resolve last-write-wins.
pub struct AppState {
    pub waybills: DashMap<Uuid, Waybill>,
    pub vehicles: DashMap<Uuid, Vehicle>,
    pub providers: DashMap<Uuid, Provider>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            waybills: DashMap::new(),
            vehicles: DashMap::new(),
            providers: DashMap::new(),
            metrics: Metrics::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
