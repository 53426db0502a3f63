use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Reorder commands executed, by kind
// - Failures, by kind and reason
// - Command latency (lock wait included)
// - Records whose order value was rewritten
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    pub reorder_commands: IntCounterVec,
    pub reorder_failures: IntCounterVec,
    pub reorder_duration: HistogramVec,
    pub records_reassigned: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let reorder_commands = IntCounterVec::new(
            Opts::new("reorder_commands_total", "Total reorder commands applied"),
            &["kind"],
        )?;
        registry.register(Box::new(reorder_commands.clone()))?;

        let reorder_failures = IntCounterVec::new(
            Opts::new("reorder_failures_total", "Total reorder commands that failed"),
            &["kind", "reason"],
        )?;
        registry.register(Box::new(reorder_failures.clone()))?;

        let reorder_duration = HistogramVec::new(
            HistogramOpts::new("reorder_duration_seconds", "Reorder command duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["kind"],
        )?;
        registry.register(Box::new(reorder_duration.clone()))?;

        let records_reassigned = IntCounter::new(
            "reorder_records_reassigned_total",
            "Total records whose order value was rewritten",
        )?;
        registry.register(Box::new(records_reassigned.clone()))?;

        Ok(Self {
            registry,
            reorder_commands,
            reorder_failures,
            reorder_duration,
            records_reassigned,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record an applied command
    pub fn record_command(&self, kind: &str, duration_secs: f64, reassigned: usize) {
        self.reorder_commands.with_label_values(&[kind]).inc();
        self.reorder_duration.with_label_values(&[kind]).observe(duration_secs);
        self.records_reassigned.inc_by(reassigned as u64);
    }

    /// Helper to record a failed command
    pub fn record_failure(&self, kind: &str, reason: &str, duration_secs: f64) {
        self.reorder_failures.with_label_values(&[kind, reason]).inc();
        self.reorder_duration.with_label_values(&[kind]).observe(duration_secs);
    }
}
