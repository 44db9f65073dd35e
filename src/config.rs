//! System configuration parameters.
//!
//! All tunable parameters for the thermobath controller. Per-channel
//! process parameters (setpoint, ramp, floor, hold) start from the
//! defaults here and are adjusted at runtime through the web interface;
//! the timing intervals are fixed for the life of the process.

use serde::{Deserialize, Serialize};

/// Number of independently controlled channels (one probe + one heater each).
pub const CHANNEL_COUNT: usize = 7;

/// User-friendly channel names for the web interface.
pub const CHANNEL_LABELS: [&str; CHANNEL_COUNT] = [
    "Syringe", "Sample 1", "Sample 2", "Sample 3", "Sample 4", "Sample 5", "Sample 6",
];

/// Fixed 64-bit DS18B20 ROM codes, one per channel. The bus is shared;
/// each probe is addressed individually by its ROM code.
pub const SENSOR_ROM_CODES: [[u8; 8]; CHANNEL_COUNT] = [
    [0x28, 0x3F, 0x4C, 0xDA, 0x05, 0x00, 0x00, 0x30],
    [0x28, 0x70, 0x40, 0x43, 0xD4, 0xAF, 0x15, 0xD4],
    [0x28, 0xAC, 0xDC, 0x46, 0xD4, 0xB9, 0x2B, 0x9D],
    [0x28, 0x0E, 0x2A, 0x45, 0xD4, 0x8D, 0x3A, 0xC8],
    [0x28, 0xC5, 0x53, 0x46, 0xD4, 0xB0, 0x37, 0xE0],
    [0x28, 0xDF, 0x12, 0x45, 0xD4, 0xC1, 0x1A, 0x74],
    [0x28, 0xCD, 0x11, 0x46, 0xD4, 0xBF, 0x64, 0x0A],
];

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Per-channel process defaults ---
    /// Initial hold setpoint (°C) for every channel.
    pub default_setpoint_c: f32,
    /// Initial cooling ramp rate (°C per minute).
    pub default_ramp_c_per_min: f32,
    /// Initial ramp floor (°C) — the setpoint never drops below this.
    pub default_floor_c: f32,
    /// Initial hold duration (minutes) after the setpoint is first reached.
    pub default_hold_mins: u32,

    // --- Timing ---
    /// Probe batch-read interval (milliseconds).
    pub sensor_refresh_interval_ms: u64,
    /// Control evaluation interval (milliseconds).
    pub control_interval_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            default_setpoint_c: 60.0,
            default_ramp_c_per_min: 1.0,
            default_floor_c: 37.0,
            default_hold_mins: 60,

            sensor_refresh_interval_ms: 2000, // 0.5 Hz — DS18B20 conversion is slow
            control_interval_ms: 500,         // 2 Hz
        }
    }
}
