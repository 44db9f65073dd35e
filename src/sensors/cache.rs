//! Last-known temperature per channel, refreshed on a slow cadence.
//!
//! Readings are stored as `f32` bit patterns in per-channel atomics, so the
//! control loop and the HTTP status path can both read without locking.
//! A probe that fails to answer is marked with the bus's disconnect
//! sentinel (−127 °C) and excluded from control for that cycle — its
//! channel's phase and output are frozen, not reset. No retries: control
//! simply resumes on the next cycle that reports a valid reading.

use core::sync::atomic::{AtomicU32, Ordering};

use log::warn;

use crate::app::ports::SensorBusPort;
use crate::config::CHANNEL_COUNT;
use crate::sensors::SensorAddress;

/// Disconnect sentinel, matching the DS18B20 driver convention.
pub const DISCONNECTED_C: f32 = -127.0;

/// A cached reading: either the most recent valid temperature or a marker
/// that the probe was unavailable on the last refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TempReading {
    Valid(f32),
    Disconnected,
}

impl TempReading {
    /// The temperature if valid.
    pub fn valid(self) -> Option<f32> {
        match self {
            Self::Valid(t) => Some(t),
            Self::Disconnected => None,
        }
    }

    /// Raw wire value: the temperature, or the −127 °C sentinel.
    pub fn wire_value(self) -> f32 {
        match self {
            Self::Valid(t) => t,
            Self::Disconnected => DISCONNECTED_C,
        }
    }
}

/// Per-channel atomic cache of the last batch read.
pub struct SensorCache {
    readings: [AtomicU32; CHANNEL_COUNT],
    addresses: [SensorAddress; CHANNEL_COUNT],
}

impl SensorCache {
    /// All channels start Disconnected until the first refresh completes.
    pub fn new(addresses: [SensorAddress; CHANNEL_COUNT]) -> Self {
        Self {
            readings: core::array::from_fn(|_| AtomicU32::new(DISCONNECTED_C.to_bits())),
            addresses,
        }
    }

    /// Batch read: one conversion request for the whole bus, then collect
    /// every probe by its ROM code. Failed probes get the sentinel.
    pub fn refresh_all(&self, bus: &mut impl SensorBusPort) {
        bus.request_all();
        for (ch, addr) in self.addresses.iter().enumerate() {
            let bits = match bus.read_by_address(*addr) {
                Ok(t) => t.to_bits(),
                Err(e) => {
                    warn!("ch{ch}: probe read failed: {e}");
                    DISCONNECTED_C.to_bits()
                }
            };
            self.readings[ch].store(bits, Ordering::Release);
        }
    }

    /// The last cached reading for `channel`.
    pub fn read(&self, channel: usize) -> TempReading {
        let t = f32::from_bits(self.readings[channel].load(Ordering::Acquire));
        if t == DISCONNECTED_C {
            TempReading::Disconnected
        } else {
            TempReading::Valid(t)
        }
    }
}
