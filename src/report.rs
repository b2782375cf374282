//! Report shaping
//!
//! Wraps a decode result with reception time, device identity and port
//! into the JSON record written by the CLI. Device names come from the
//! injected `DeviceNames` directory.

use crate::codec::Fields;
use crate::config::DeviceNames;
use crate::decoder::Decoded;
use crate::format::Metadata;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Device identity as reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub eui: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One decoded uplink ready for output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub received_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u8>,
    pub format: &'static str,
    pub consumed: usize,
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Builds reports with a fixed device directory and output options
#[derive(Debug, Clone)]
pub struct Reporter {
    devices: DeviceNames,
    include_metadata: bool,
}

impl Reporter {
    pub fn new(devices: DeviceNames, include_metadata: bool) -> Self {
        Self {
            devices,
            include_metadata,
        }
    }

    pub fn report(
        &self,
        decoded: Decoded,
        port: Option<u8>,
        device_eui: Option<&str>,
        received_at: DateTime<Utc>,
    ) -> Report {
        let device = device_eui.map(|eui| Device {
            eui: eui.to_string(),
            name: self.devices.resolve(eui).map(str::to_string),
        });

        Report {
            received_at,
            device,
            port,
            format: decoded.format,
            consumed: decoded.consumed,
            fields: decoded.fields,
            metadata: self.include_metadata.then_some(decoded.metadata),
        }
    }
}
