use serde::Deserialize;
use std::collections::HashMap;

/// One raw status snapshot as returned by the base station hub. Every
/// top-level field may be missing; absence is never an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRtkStatus {
    #[serde(default)]
    pub antenna: Option<RawAntenna>,
    /// Message key to `[timestampMillis, bitsPerSecondReceived]`.
    #[serde(default)]
    pub messages: HashMap<String, (i64, f64)>,
    /// Message key to `[timestampMillis, bitsPerSecondTransferred]`.
    /// Absence means the hub reports no transmit-side bandwidth at all.
    #[serde(default)]
    pub messages_tx: Option<HashMap<String, (i64, f64)>>,
    /// Satellite key to carrier-to-noise ratio.
    #[serde(default)]
    pub cnr: HashMap<String, f64>,
    /// Opaque survey record, passed through untouched.
    #[serde(default = "empty_object")]
    pub survey: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAntenna {
    #[serde(default)]
    pub descriptor: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub station_id: Option<u32>,
    /// `[lon * 1e7, lat * 1e7, height_mm]`; the third element may be absent.
    #[serde(default)]
    pub position: Option<Vec<i64>>,
    /// Kept as opaque JSON: a non-array value here degrades to "absent"
    /// during normalization instead of failing the whole snapshot.
    #[serde(rename = "positionECEF", default)]
    pub position_ecef: Option<serde_json::Value>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
