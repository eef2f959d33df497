//! Dispatch metrics for the Easiware piece
//!
//! Every request issued by [`crate::client::EasiwareClient`] is recorded here,
//! keyed by the action or trigger operation that issued it.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a single dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// Status matched the operation's expectation
    Expected,
    /// Remote answered with another status
    UnexpectedStatus,
    /// No answer: DNS, connection, timeout
    TransportFailure,
}

/// Per-operation counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationStats {
    pub total_requests: u64,
    pub expected_status: u64,
    pub unexpected_status: u64,
    pub transport_failures: u64,
    pub total_response_time_ms: u64,
}

impl OperationStats {
    pub fn avg_response_time_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_response_time_ms as f64 / self.total_requests as f64
        }
    }
}

/// Metrics snapshot for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub operations: BTreeMap<String, OperationStats>,
}

/// Thread-safe metrics collector shared by every client of a piece instance
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    operations: Mutex<BTreeMap<String, OperationStats>>,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: &str, result: DispatchResult, response_time_ms: u64) {
        let mut operations = self.operations.lock();
        let stats = operations.entry(operation.to_string()).or_default();

        stats.total_requests += 1;
        stats.total_response_time_ms += response_time_ms;
        match result {
            DispatchResult::Expected => stats.expected_status += 1,
            DispatchResult::UnexpectedStatus => stats.unexpected_status += 1,
            DispatchResult::TransportFailure => stats.transport_failures += 1,
        }
    }

    pub fn stats(&self, operation: &str) -> Option<OperationStats> {
        self.operations.lock().get(operation).cloned()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            operations: self.operations.lock().clone(),
        }
    }

    pub fn reset(&self) {
        self.operations.lock().clear();
    }

    /// Export metrics in Prometheus format
    pub fn to_prometheus_format(&self) -> String {
        let operations = self.operations.lock();
        let mut output = String::new();

        output.push_str("# HELP easiware_requests_total Total number of Easiware API requests\n");
        output.push_str("# TYPE easiware_requests_total counter\n");
        for (operation, stats) in operations.iter() {
            output.push_str(&format!(
                "easiware_requests_total{{operation=\"{}\",result=\"expected\"}} {}\n",
                operation, stats.expected_status
            ));
            output.push_str(&format!(
                "easiware_requests_total{{operation=\"{}\",result=\"unexpected_status\"}} {}\n",
                operation, stats.unexpected_status
            ));
            output.push_str(&format!(
                "easiware_requests_total{{operation=\"{}\",result=\"transport_failure\"}} {}\n",
                operation, stats.transport_failures
            ));
        }
        output.push('\n');

        output.push_str(
            "# HELP easiware_response_time_seconds Average response time in seconds\n",
        );
        output.push_str("# TYPE easiware_response_time_seconds gauge\n");
        for (operation, stats) in operations.iter() {
            output.push_str(&format!(
                "easiware_response_time_seconds{{operation=\"{}\"}} {}\n",
                operation,
                stats.avg_response_time_ms() / 1000.0
            ));
        }

        output
    }
}
