//! Sensor subsystem — the shared-bus probe cache.
//!
//! All DS18B20 probes hang off one OneWire line and are addressed by their
//! fixed 64-bit ROM codes. The [`SensorCache`](cache::SensorCache) is the
//! only sensor state the control loop ever sees; the bus itself sits
//! behind the [`SensorBusPort`](crate::app::ports::SensorBusPort) trait.

pub mod cache;

pub use cache::{SensorCache, TempReading, DISCONNECTED_C};

/// Opaque per-channel bus identity (DS18B20 64-bit ROM code),
/// configured at start-up and fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorAddress(pub [u8; 8]);
