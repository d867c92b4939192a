use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub ride_transitions_total: IntCounterVec,
    pub lifecycle_errors_total: IntCounterVec,
    pub available_drivers: IntGauge,
    pub ride_fare: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ride_transitions_total = IntCounterVec::new(
            Opts::new("ride_transitions_total", "Ride status transitions by target status"),
            &["status"],
        )
        .expect("valid ride_transitions_total metric");

        let lifecycle_errors_total = IntCounterVec::new(
            Opts::new("lifecycle_errors_total", "Rejected lifecycle operations by kind"),
            &["kind"],
        )
        .expect("valid lifecycle_errors_total metric");

        let available_drivers =
            IntGauge::new("available_drivers", "Drivers currently free for assignment")
                .expect("valid available_drivers metric");

        let ride_fare = Histogram::with_opts(
            HistogramOpts::new("ride_fare", "Settled ride fares").buckets(vec![
                50.0, 75.0, 100.0, 150.0, 250.0, 500.0, 1_000.0, 2_500.0,
            ]),
        )
        .expect("valid ride_fare metric");

        registry
            .register(Box::new(ride_transitions_total.clone()))
            .expect("register ride_transitions_total");
        registry
            .register(Box::new(lifecycle_errors_total.clone()))
            .expect("register lifecycle_errors_total");
        registry
            .register(Box::new(available_drivers.clone()))
            .expect("register available_drivers");
        registry
            .register(Box::new(ride_fare.clone()))
            .expect("register ride_fare");

        Self {
            registry,
            ride_transitions_total,
            lifecycle_errors_total,
            available_drivers,
            ride_fare,
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
