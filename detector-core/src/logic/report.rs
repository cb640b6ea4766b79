//! Result formatting
//!
//! Turns a classification into the strings shown on the result panel:
//! score with 3 decimals, rates with 2 decimals, volumes with thousands
//! separators.

use serde::{Deserialize, Serialize};

use crate::logic::features::FlowRecord;
use crate::logic::model::ScoredResult;

pub const VERDICT_ANOMALY: &str = "Anomaly Detected";
pub const VERDICT_NORMAL: &str = "Normal Traffic Pattern";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReport {
    pub verdict: String,
    pub anomaly_score: String,

    // Traffic volume
    pub total_bytes: String,
    pub packets: String,
    pub duration: String,

    // Performance metrics
    pub bytes_per_packet: String,
    pub bytes_per_second: String,
    pub packets_per_second: String,

    pub reasons: Vec<String>,
}

impl FlowReport {
    pub fn new(record: &FlowRecord, result: &ScoredResult) -> Self {
        let verdict = if result.is_anomaly { VERDICT_ANOMALY } else { VERDICT_NORMAL };

        Self {
            verdict: verdict.to_string(),
            anomaly_score: format!("{:.3}", result.anomaly_score),
            total_bytes: format_thousands(result.total_bytes),
            packets: format_thousands(record.packets_sent),
            duration: format!("{}s", record.duration_seconds),
            bytes_per_packet: format!("{:.2}", result.bytes_per_packet),
            bytes_per_second: format!("{:.2}", result.bytes_per_second),
            packets_per_second: format!("{:.2}", result.packets_per_second),
            reasons: result.reasons.clone(),
        }
    }
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::RuleViolation;

    fn result(is_anomaly: bool) -> ScoredResult {
        ScoredResult {
            anomaly_score: -0.43217,
            is_anomaly,
            total_bytes: 2_000_000,
            bytes_per_packet: 200_000.0,
            bytes_per_second: 2_000_000.0,
            packets_per_second: 10.0,
            offset: -0.5,
            model_outlier: false,
            violations: vec![RuleViolation::BytesPerPacket],
            reasons: vec!["Bytes per packet 200000.00 exceeds 500".to_string()],
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(2_200), "2,200");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_report_fields() {
        let report = FlowReport::new(&FlowRecord::anomalous_example(), &result(true));

        assert_eq!(report.verdict, VERDICT_ANOMALY);
        assert_eq!(report.anomaly_score, "-0.432");
        assert_eq!(report.total_bytes, "2,000,000");
        assert_eq!(report.packets, "10");
        assert_eq!(report.duration, "1s");
        assert_eq!(report.bytes_per_packet, "200000.00");
        assert_eq!(report.bytes_per_second, "2000000.00");
        assert_eq!(report.packets_per_second, "10.00");
        assert_eq!(report.reasons.len(), 1);
    }

    #[test]
    fn test_normal_verdict() {
        let report = FlowReport::new(&FlowRecord::normal_example(), &result(false));
        assert_eq!(report.verdict, VERDICT_NORMAL);
    }
}
