//! GPIO pin assignments for the thermobath main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

use crate::config::CHANNEL_COUNT;

// ---------------------------------------------------------------------------
// Heater relay outputs (one per channel, active HIGH)
// ---------------------------------------------------------------------------

/// Pins 1 (TX) and 3 (RX) are avoided — they conflict with serial debug.
pub const HEATER_GPIOS: [i32; CHANNEL_COUNT] = [2, 5, 14, 12, 16, 15, 13];

// ---------------------------------------------------------------------------
// OneWire bus (all DS18B20 probes share this line)
// ---------------------------------------------------------------------------

pub const ONEWIRE_BUS_GPIO: i32 = 4;
