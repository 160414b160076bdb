//! # Metrics
//!
//! Prometheus metrics for monitoring Secret synchronization.
//!
//! ## Metrics Exposed
//!
//! - `onepassword_secret_reconciliations_total{outcome}` - Reconciliations by outcome
//!   (created, updated, unchanged, failed)
//! - `onepassword_secret_reconciliation_duration_seconds` - Duration of reconciliations
//! - `onepassword_secret_payload_strategy_total{strategy}` - Payloads built by strategy
//!   (image_pull, template, field_mapping)
//! - `onepassword_secret_payload_keys_skipped_total{reason}` - Data keys dropped while
//!   building a payload

use anyhow::Result;
use prometheus::{Encoder, Histogram, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "onepassword_secret_reconciliations_total",
            "Total number of Secret reconciliations by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "onepassword_secret_reconciliation_duration_seconds",
            "Duration of Secret reconciliation in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static PAYLOAD_STRATEGY_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "onepassword_secret_payload_strategy_total",
            "Total number of Secret payloads built by strategy",
        ),
        &["strategy"],
    )
    .expect("Failed to create PAYLOAD_STRATEGY_TOTAL metric - this should never happen")
});

static PAYLOAD_KEYS_SKIPPED_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "onepassword_secret_payload_keys_skipped_total",
            "Total number of Secret data keys skipped while building payloads",
        ),
        &["reason"],
    )
    .expect("Failed to create PAYLOAD_KEYS_SKIPPED_TOTAL metric - this should never happen")
});

/// Register all metrics with the crate registry
///
/// Safe to call more than once.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    register(Box::new(RECONCILIATION_DURATION.clone()))?;
    register(Box::new(PAYLOAD_STRATEGY_TOTAL.clone()))?;
    register(Box::new(PAYLOAD_KEYS_SKIPPED_TOTAL.clone()))?;
    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<()> {
    match REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn record_reconciliation(outcome: &str, duration: f64) {
    RECONCILIATIONS_TOTAL.with_label_values(&[outcome]).inc();
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_payload_strategy(strategy: &str) {
    PAYLOAD_STRATEGY_TOTAL.with_label_values(&[strategy]).inc();
}

pub fn increment_payload_keys_skipped(reason: &str) {
    PAYLOAD_KEYS_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
}

/// Encode registered metrics in the Prometheus text exposition format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn gather() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent_and_gathers() {
        register_metrics().unwrap();
        register_metrics().unwrap();

        record_reconciliation("created", 0.02);
        increment_payload_strategy("field_mapping");
        increment_payload_keys_skipped("empty_key");

        let text = gather().unwrap();
        assert!(text.contains("onepassword_secret_reconciliations_total"));
        assert!(text.contains("outcome=\"created\""));
        assert!(text.contains("onepassword_secret_payload_strategy_total"));
    }
}
