mod normalize;
mod raw;
mod types;

pub use normalize::normalize;
pub use raw::{RawAntenna, RawRtkStatus};
pub use types::{AntennaInfo, MessageStats, RtkStatus, SatelliteCnr};
