// Prometheus metrics definitions for the pagination service.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Navigation sessions whose controls are still live.
    pub static ref ACTIVE_SESSIONS: IntGauge =
        IntGauge::new("goldfish_pager_active_sessions", "Live navigation sessions").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Page sets sent, by kind (static, interactive).
    pub static ref SESSIONS_STARTED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("goldfish_pager_sessions_started_total", "Page sets sent"),
        &["kind"],
    )
    .unwrap();

    /// Navigation presses, by action and outcome.
    pub static ref NAVIGATION_ACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("goldfish_pager_navigation_actions_total", "Navigation button presses"),
        &["action", "outcome"],
    )
    .unwrap();

    /// Sessions that timed out and had their controls removed.
    pub static ref CONTROLS_STRIPPED_TOTAL: IntCounter = IntCounter::new(
        "goldfish_pager_controls_stripped_total",
        "Expired sessions whose controls were stripped",
    )
    .unwrap();

    /// Message edits that failed and were swallowed, by kind (render, strip).
    pub static ref SIDE_EFFECT_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("goldfish_pager_side_effect_failures_total", "Failed message edits"),
        &["kind"],
    )
    .unwrap();

    /// Inbound interactions, by type and verification result.
    pub static ref INTERACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("goldfish_interactions_total", "Inbound Discord interactions"),
        &["kind", "status"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ACTIVE_SESSIONS.clone()),
        Box::new(SESSIONS_STARTED_TOTAL.clone()),
        Box::new(NAVIGATION_ACTIONS_TOTAL.clone()),
        Box::new(CONTROLS_STRIPPED_TOTAL.clone()),
        Box::new(SIDE_EFFECT_FAILURES_TOTAL.clone()),
        Box::new(INTERACTIONS_TOTAL.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
