use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub waybills_created_total: IntCounter,
    pub transitions_total: IntCounterVec,
    pub settlements_total: IntCounterVec,
    pub cod_outstanding: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let waybills_created_total =
            IntCounter::new("waybills_created_total", "Total waybills created")
                .expect("valid waybills_created_total metric");

        let transitions_total = IntCounterVec::new(
            Opts::new(
                "waybill_transitions_total",
                "Status transitions by edge and outcome",
            ),
            &["transition", "outcome"],
        )
        .expect("valid waybill_transitions_total metric");

        let settlements_total = IntCounterVec::new(
            Opts::new("cod_settlements_total", "COD settlement attempts by outcome"),
            &["outcome"],
        )
        .expect("valid cod_settlements_total metric");

        let cod_outstanding = IntGauge::new(
            "cod_outstanding_amount",
            "COD held by drivers on delivered waybills, minor currency units",
        )
        .expect("valid cod_outstanding_amount metric");

        registry
            .register(Box::new(waybills_created_total.clone()))
            .expect("register waybills_created_total");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register waybill_transitions_total");
        registry
            .register(Box::new(settlements_total.clone()))
            .expect("register cod_settlements_total");
        registry
            .register(Box::new(cod_outstanding.clone()))
            .expect("register cod_outstanding_amount");

        Self {
            registry,
            waybills_created_total,
            transitions_total,
            settlements_total,
            cod_outstanding,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
