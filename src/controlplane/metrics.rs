//! Tool Call Metrics
//!
//! Prometheus counters and latency histograms for tool invocations, kept in
//! a registry owned by the dispatcher.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Error, Result};

/// Outcome label for a successful call
pub const OUTCOME_SUCCESS: &str = "success";

/// Outcome label for a failed call
pub const OUTCOME_ERROR: &str = "error";

/// Metrics for the tool dispatcher
#[derive(Clone)]
pub struct ToolMetrics {
    registry: Registry,
    calls: IntCounterVec,
    duration: HistogramVec,
}

impl ToolMetrics {
    /// Create and register the tool metrics
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let calls = IntCounterVec::new(
            Opts::new("rook_ceph_mcp_tool_calls_total", "Total number of tool calls"),
            &["tool", "outcome"],
        )
        .map_err(metrics_error)?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "rook_ceph_mcp_tool_call_duration_seconds",
                "Duration of tool calls",
            ),
            &["tool"],
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(calls.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(duration.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            registry,
            calls,
            duration,
        })
    }

    /// Record one finished call
    pub fn observe(&self, tool: &str, success: bool, seconds: f64) {
        let outcome = if success { OUTCOME_SUCCESS } else { OUTCOME_ERROR };
        self.calls.with_label_values(&[tool, outcome]).inc();
        self.duration.with_label_values(&[tool]).observe(seconds);
    }

    /// Number of calls recorded for a tool and outcome
    pub fn call_count(&self, tool: &str, outcome: &str) -> u64 {
        self.calls.with_label_values(&[tool, outcome]).get()
    }

    /// Prometheus text exposition of every metric
    pub fn encode(&self) -> Result<(String, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        let body = String::from_utf8(buffer)
            .map_err(|e| Error::Internal(format!("Metrics are not UTF-8: {}", e)))?;
        Ok((encoder.format_type().to_string(), body))
    }
}

fn metrics_error(e: prometheus::Error) -> Error {
    Error::Internal(format!("Metrics error: {}", e))
}
