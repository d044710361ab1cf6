//! Models for the QEMU endpoints the demonstration accessor surface covers.

use serde::{Deserialize, Serialize};

/// One entry from `GET /nodes/{node}/qemu`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VmListItem {
    /// Cluster-unique VM identifier.
    pub vmid: u32,
    /// Current status ("running", "stopped").
    pub status: String,
    /// Human-readable name; absent on freshly restored VMs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CPU utilization, 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Used memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Configured memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Uptime in seconds, when running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Comma-separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Runtime status from `GET /nodes/{node}/qemu/{vmid}/status/current`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VmStatus {
    /// Current status ("running", "stopped", "paused").
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// QEMU monitor status, which can disagree with `status` briefly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmpstatus: Option<String>,
    /// Configuration digest, needed for compare-and-swap updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}
