//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog queries (count, result sizes)
//! - Game launches and remote commands issued through the gateway
//! - Display client fan-out

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Catalog queries served.
pub static CATALOG_QUERIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("cabinet_catalog_queries_total", "Total catalog queries").unwrap()
});

/// Games returned per catalog query.
pub static CATALOG_QUERY_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "cabinet_catalog_query_results",
            "Number of games returned per catalog query",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]),
    )
    .unwrap()
});

// =============================================================================
// Gateway
// =============================================================================

/// Game launches by result.
pub static GAME_LAUNCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cabinet_game_launches_total", "Total game launch attempts"),
        &["result"], // "success", "failed", "error"
    )
    .unwrap()
});

/// Remote command duration in seconds.
pub static GATEWAY_COMMAND_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cabinet_gateway_command_duration_seconds",
            "Duration of remote commands sent to the game server",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["command", "result"], // command: "launch", "stop", "query", "volume", "client"
    )
    .unwrap()
});

/// Display client launches by result.
pub static CLIENT_LAUNCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cabinet_client_launches_total",
            "Total display client launches",
        ),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Collect all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_QUERIES_TOTAL.clone()),
        Box::new(CATALOG_QUERY_RESULTS.clone()),
        Box::new(GAME_LAUNCHES_TOTAL.clone()),
        Box::new(GATEWAY_COMMAND_DURATION.clone()),
        Box::new(CLIENT_LAUNCHES_TOTAL.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_once() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        GAME_LAUNCHES_TOTAL.with_label_values(&["success"]).inc();

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"cabinet_game_launches_total".to_string()));
        assert!(names.contains(&"cabinet_catalog_queries_total".to_string()));
    }
}
