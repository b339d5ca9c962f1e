//! Prometheus metrics for the scanner and its HTTP server.

use prometheus::{
    Counter, Encoder, Gauge, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::models::signal::AlertCategory;

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: Counter,
    pub http_requests_in_flight: Gauge,
    pub http_request_duration_seconds: Histogram,

    pub scan_cycles_total: Counter,
    pub scan_cycle_failures_total: Counter,
    pub scan_cycle_duration_seconds: Histogram,
    pub scan_instruments: Gauge,

    /// Labelled by outcome: `alerted`, `evaluated`, `not_ready`, `failed`.
    pub signal_evaluations_total: IntCounterVec,
    /// Labelled by alert category.
    pub alerts_emitted_total: IntCounterVec,
    pub alert_memory_resets_total: Counter,
    pub alert_delivery_failures_total: Counter,
    pub active_alerts: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            Counter::with_opts(Opts::new("http_requests_total", "Total HTTP requests served"))?;
        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;

        let scan_cycles_total =
            Counter::with_opts(Opts::new("scan_cycles_total", "Completed scan cycles"))?;
        let scan_cycle_failures_total = Counter::with_opts(Opts::new(
            "scan_cycle_failures_total",
            "Scan cycles aborted because the instrument universe could not be listed",
        ))?;
        let scan_cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("scan_cycle_duration_seconds", "Scan cycle duration in seconds")
                .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        let scan_instruments = Gauge::with_opts(Opts::new(
            "scan_instruments",
            "Instruments in the most recent scan cycle",
        ))?;

        let signal_evaluations_total = IntCounterVec::new(
            Opts::new("signal_evaluations_total", "Per-instrument evaluations by outcome"),
            &["outcome"],
        )?;
        let alerts_emitted_total = IntCounterVec::new(
            Opts::new("alerts_emitted_total", "Alerts handed to the notifier"),
            &["category"],
        )?;
        let alert_memory_resets_total = Counter::with_opts(Opts::new(
            "alert_memory_resets_total",
            "Active alerts cleared by a neutral verdict",
        ))?;
        let alert_delivery_failures_total = Counter::with_opts(Opts::new(
            "alert_delivery_failures_total",
            "Alerts the notifier failed to deliver",
        ))?;
        let active_alerts = Gauge::with_opts(Opts::new(
            "active_alerts",
            "Instruments currently holding an alert in memory",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(scan_cycles_total.clone()))?;
        registry.register(Box::new(scan_cycle_failures_total.clone()))?;
        registry.register(Box::new(scan_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(scan_instruments.clone()))?;
        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(alert_memory_resets_total.clone()))?;
        registry.register(Box::new(alert_delivery_failures_total.clone()))?;
        registry.register(Box::new(active_alerts.clone()))?;

        // expose every category series from the start
        for category in AlertCategory::ALL {
            alerts_emitted_total.with_label_values(&[category.as_str()]);
        }

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            scan_cycles_total,
            scan_cycle_failures_total,
            scan_cycle_duration_seconds,
            scan_instruments,
            signal_evaluations_total,
            alerts_emitted_total,
            alert_memory_resets_total,
            alert_delivery_failures_total,
            active_alerts,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
