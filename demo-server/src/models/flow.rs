//! Flow request/response models

use serde::{Deserialize, Serialize};
use validator::Validate;

use flowguard_core::{FlowRecord, FlowReport, Protocol, ScoredResult};

/// Form input. Unsigned types already reject negative counts and ports.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClassifyRequest {
    pub source_bytes: u64,
    pub destination_bytes: u64,

    #[validate(range(min = 1, message = "packets_sent must be at least 1"))]
    pub packets_sent: u64,

    #[validate(range(min = 1, message = "packets_received must be at least 1"))]
    pub packets_received: u64,

    #[validate(range(min = 1, message = "duration_seconds must be at least 1"))]
    pub duration_seconds: u64,

    pub source_port: u16,
    pub destination_port: u16,
    pub protocol: Protocol,
}

impl From<ClassifyRequest> for FlowRecord {
    fn from(req: ClassifyRequest) -> Self {
        FlowRecord {
            source_bytes: req.source_bytes,
            destination_bytes: req.destination_bytes,
            packets_sent: req.packets_sent,
            packets_received: req.packets_received,
            duration_seconds: req.duration_seconds,
            source_port: req.source_port,
            destination_port: req.destination_port,
            protocol: req.protocol,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub record: FlowRecord,
    pub result: ScoredResult,
    pub report: FlowReport,
}

/// Suggested form presets
#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub normal: FlowRecord,
    pub anomalous: FlowRecord,
}
