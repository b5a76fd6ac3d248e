use serde::Serialize;
use std::collections::HashMap;

/// Normalized status of an RTK base station. Replaced wholesale on every
/// successful poll; no history is retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtkStatus {
    pub antenna: AntennaInfo,
    pub messages: HashMap<String, MessageStats>,
    pub satellites: HashMap<String, SatelliteCnr>,
    pub survey: serde_json::Value,
    pub last_updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntennaInfo {
    pub descriptor: String,
    pub serial_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<u32>,
    /// `[latitude_deg, longitude_deg]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(rename = "positionECEF", skip_serializing_if = "Option::is_none")]
    pub position_ecef: Option<Vec<i64>>,
    /// Meters above the ellipsoid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    /// Age of the freshest observation for this message, in milliseconds.
    pub last_updated_at: i64,
    pub bits_per_second_received: f64,
    /// `None` when the hub reports no transmit-side bandwidth at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_second_transferred: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteCnr {
    pub last_updated_at: i64,
    pub cnr: f64,
}
