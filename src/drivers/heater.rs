//! Heater relay bank — one binary output per channel.
//!
//! A dumb actuator over `embedded-hal` [`OutputPin`]s: the control loop
//! decides, this driver only mirrors the decision onto the pins. All
//! relays are driven LOW at construction so heaters are guaranteed off
//! from boot until the first control cycle.

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::CHANNEL_COUNT;

/// Relay states for every channel, kept alongside the pins so adapters
/// can answer "is this heater on?" without reading hardware back.
pub struct HeaterBank<P: OutputPin> {
    pins: [P; CHANNEL_COUNT],
    engaged: [bool; CHANNEL_COUNT],
}

impl<P: OutputPin> HeaterBank<P> {
    /// Take ownership of the relay pins and drive them all LOW.
    pub fn new(mut pins: [P; CHANNEL_COUNT]) -> Self {
        for pin in &mut pins {
            let _ = pin.set_low();
        }
        Self {
            pins,
            engaged: [false; CHANNEL_COUNT],
        }
    }

    /// Drive one relay. Idempotent; failures on the pin are ignored
    /// (relay outputs are assumed infallible by the core).
    pub fn set(&mut self, channel: usize, engaged: bool) {
        let _ = self.pins[channel].set_state(PinState::from(engaged));
        self.engaged[channel] = engaged;
    }

    /// Last commanded state for one relay.
    pub fn is_engaged(&self, channel: usize) -> bool {
        self.engaged[channel]
    }
}
