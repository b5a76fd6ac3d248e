use std::collections::HashMap;

use super::raw::RawRtkStatus;
use super::types::{AntennaInfo, MessageStats, RtkStatus, SatelliteCnr};

/// Normalizes one raw snapshot into an [`RtkStatus`]. Pure and total:
/// missing fields take defaults, nothing here can fail. `now_ms` is the
/// poll timestamp in epoch milliseconds.
pub fn normalize(raw: &RawRtkStatus, now_ms: i64) -> RtkStatus {
    let antenna = raw.antenna.clone().unwrap_or_default();
    let has_tx_bandwidth_info = raw.messages_tx.is_some();

    let mut position = None;
    let mut height = None;
    if let Some(p) = &antenna.position {
        // Wire order is [lon-like, lat-like, height_mm]; output is [lat, lon].
        if p.len() >= 2 {
            position = Some([p[1] as f64 / 1e7, p[0] as f64 / 1e7]);
            height = p.get(2).map(|h| *h as f64 / 1e3);
        }
    }

    let position_ecef = antenna
        .position_ecef
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|coords| {
            coords
                .iter()
                .take(3)
                .map(|x| x.as_f64().unwrap_or(0.0).round() as i64)
                .collect()
        });

    let mut messages: HashMap<String, MessageStats> = HashMap::new();

    for (key, (timestamp, bits_per_second)) in &raw.messages {
        messages.insert(
            key.clone(),
            MessageStats {
                last_updated_at: now_ms - timestamp,
                bits_per_second_received: *bits_per_second,
                bits_per_second_transferred: has_tx_bandwidth_info.then_some(0.0),
            },
        );
    }

    if let Some(messages_tx) = &raw.messages_tx {
        for (key, (timestamp, bits_per_second)) in messages_tx {
            let age = now_ms - timestamp;
            let entry = messages.entry(key.clone()).or_insert(MessageStats {
                last_updated_at: age,
                bits_per_second_received: 0.0,
                bits_per_second_transferred: Some(0.0),
            });
            // Keep whichever side observed the message more recently, but
            // the transmit bitrate always wins, matching the hub's own
            // accounting.
            entry.last_updated_at = entry.last_updated_at.min(age);
            entry.bits_per_second_transferred = Some(*bits_per_second);
        }
    }

    let satellites = raw
        .cnr
        .iter()
        .map(|(key, cnr)| {
            // CNR snapshots carry no per-satellite age; stamp them with the
            // poll time.
            (
                key.clone(),
                SatelliteCnr {
                    last_updated_at: now_ms,
                    cnr: *cnr,
                },
            )
        })
        .collect();

    RtkStatus {
        antenna: AntennaInfo {
            descriptor: antenna.descriptor.unwrap_or_default(),
            serial_number: antenna.serial_number.unwrap_or_default(),
            station_id: antenna.station_id,
            position,
            position_ecef,
            height,
        },
        messages,
        satellites,
        survey: raw.survey.clone(),
        last_updated_at: now_ms,
    }
}
