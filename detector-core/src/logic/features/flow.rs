//! Flow Record - One candidate observation
//!
//! Only source/destination bytes, packets sent and duration feed the model.
//! Ports, received packets and protocol are carried for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};
use super::vector::FeatureVector;

// ============================================================================
// PROTOCOL
// ============================================================================

/// Transport protocol of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    pub const ALL: [Protocol; 3] = [Protocol::Tcp, Protocol::Udp, Protocol::Icmp];

    /// Numeric encoding (TCP=1, UDP=2, ICMP=3)
    pub fn code(self) -> u8 {
        match self {
            Protocol::Tcp => 1,
            Protocol::Udp => 2,
            Protocol::Icmp => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Protocol::Tcp),
            2 => Some(Protocol::Udp),
            3 => Some(Protocol::Icmp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TCP" => Ok(Protocol::Tcp),
            "UDP" => Ok(Protocol::Udp),
            "ICMP" => Ok(Protocol::Icmp),
            _ => Err(DetectorError::UnknownProtocol(s.to_string())),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = DetectorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ============================================================================
// FLOW RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source_bytes: u64,
    pub destination_bytes: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub duration_seconds: u64,
    pub source_port: u16,
    pub destination_port: u16,
    pub protocol: Protocol,
}

impl FlowRecord {
    /// Suggested pattern of ordinary web traffic
    pub fn normal_example() -> Self {
        Self {
            source_bytes: 1_000,
            destination_bytes: 1_200,
            packets_sent: 100,
            packets_received: 100,
            duration_seconds: 10,
            source_port: 80,
            destination_port: 443,
            protocol: Protocol::Tcp,
        }
    }

    /// Suggested pattern of a bulk transfer burst
    pub fn anomalous_example() -> Self {
        Self {
            source_bytes: 1_000_000,
            destination_bytes: 1_000_000,
            packets_sent: 10,
            packets_received: 5,
            duration_seconds: 1,
            source_port: 5000,
            destination_port: 22,
            protocol: Protocol::Udp,
        }
    }

    /// Reject records whose rates would divide by zero
    pub fn validate(&self) -> Result<()> {
        if self.packets_sent == 0 {
            return Err(DetectorError::InvalidInput {
                field: "packets_sent",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.duration_seconds == 0 {
            return Err(DetectorError::InvalidInput {
                field: "duration_seconds",
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }

    pub fn total_bytes(&self) -> Result<u64> {
        self.source_bytes
            .checked_add(self.destination_bytes)
            .ok_or_else(|| DetectorError::InvalidInput {
                field: "destination_bytes",
                reason: "total byte count overflows".to_string(),
            })
    }

    /// Model features in layout order
    pub fn features(&self) -> FeatureVector {
        FeatureVector::from([
            self.source_bytes as f64,
            self.destination_bytes as f64,
            self.packets_sent as f64,
            self.duration_seconds as f64,
        ])
    }
}

// ============================================================================
// DERIVED METRICS
// ============================================================================

/// Rates derived from a flow record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub total_bytes: u64,
    pub bytes_per_packet: f64,
    pub bytes_per_second: f64,
    pub packets_per_second: f64,
}

impl FlowMetrics {
    /// Compute the rates. Fails on zero packets or zero duration.
    pub fn compute(record: &FlowRecord) -> Result<Self> {
        record.validate()?;

        let total_bytes = record.total_bytes()?;
        let total = total_bytes as f64;
        let packets = record.packets_sent as f64;
        let duration = record.duration_seconds as f64;

        Ok(Self {
            total_bytes,
            bytes_per_packet: total / packets,
            bytes_per_second: total / duration,
            packets_per_second: packets / duration,
        })
    }
}
