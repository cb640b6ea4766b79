//! Rule Threshold Configuration
//!
//! Hard limits a flow must stay within to be labeled normal. Any violated
//! rule forces an anomaly verdict regardless of the model score.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_BYTES_PER_PACKET, DEFAULT_MAX_BYTES_PER_SECOND, DEFAULT_MAX_PACKETS_PER_SECOND,
    DEFAULT_MIN_ANOMALY_SCORE,
};
use crate::logic::features::FlowMetrics;

/// Threshold Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub max_bytes_per_packet: f64,
    pub max_bytes_per_second: f64,
    pub max_packets_per_second: f64,

    /// Lowest model score still considered normal
    pub min_anomaly_score: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_bytes_per_packet: DEFAULT_MAX_BYTES_PER_PACKET,
            max_bytes_per_second: DEFAULT_MAX_BYTES_PER_SECOND,
            max_packets_per_second: DEFAULT_MAX_PACKETS_PER_SECOND,
            min_anomaly_score: DEFAULT_MIN_ANOMALY_SCORE,
        }
    }
}

/// One rule that a flow failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    BytesPerPacket,
    BytesPerSecond,
    PacketsPerSecond,
    AnomalyScore,
}

impl ThresholdConfig {
    /// Evaluate all four rules. Empty result = normal.
    /// Comparisons are negated so a NaN fails its rule.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn violations(&self, metrics: &FlowMetrics, anomaly_score: f64) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        if !(metrics.bytes_per_packet <= self.max_bytes_per_packet) {
            violations.push(RuleViolation::BytesPerPacket);
        }
        if !(metrics.bytes_per_second <= self.max_bytes_per_second) {
            violations.push(RuleViolation::BytesPerSecond);
        }
        if !(metrics.packets_per_second <= self.max_packets_per_second) {
            violations.push(RuleViolation::PacketsPerSecond);
        }
        if !(anomaly_score >= self.min_anomaly_score) {
            violations.push(RuleViolation::AnomalyScore);
        }

        violations
    }

    /// Human readable reason for a violation
    pub fn describe(&self, violation: RuleViolation, metrics: &FlowMetrics, anomaly_score: f64) -> String {
        match violation {
            RuleViolation::BytesPerPacket => format!(
                "Bytes per packet {:.2} exceeds {}",
                metrics.bytes_per_packet, self.max_bytes_per_packet
            ),
            RuleViolation::BytesPerSecond => format!(
                "Bytes per second {:.2} exceeds {}",
                metrics.bytes_per_second, self.max_bytes_per_second
            ),
            RuleViolation::PacketsPerSecond => format!(
                "Packets per second {:.2} exceeds {}",
                metrics.packets_per_second, self.max_packets_per_second
            ),
            RuleViolation::AnomalyScore => format!(
                "Anomaly score {:.3} below {}",
                anomaly_score, self.min_anomaly_score
            ),
        }
    }
}
