//! Mock hardware adapter for integration tests.
//!
//! Stands in for the 1-Wire bus and the heater relay bank: tests set
//! per-channel temperatures (or disconnect a probe) and assert on the
//! full relay command history without touching real GPIO.

use thermobath::app::events::AppEvent;
use thermobath::app::ports::{EventSink, OutputPort, SensorBusPort};
use thermobath::config::{CHANNEL_COUNT, SENSOR_ROM_CODES};
use thermobath::error::SensorError;
use thermobath::sensors::SensorAddress;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// What each probe will report on the next refresh.
    pub temps: [Result<f32, SensorError>; CHANNEL_COUNT],
    /// Number of batch conversion requests seen.
    pub conversions: usize,
    /// Last commanded level per relay.
    pub outputs: [bool; CHANNEL_COUNT],
    /// Full relay command history, in order.
    pub output_calls: Vec<(usize, bool)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temps: [Ok(20.0); CHANNEL_COUNT],
            conversions: 0,
            outputs: [false; CHANNEL_COUNT],
            output_calls: Vec::new(),
        }
    }

    pub fn set_temp(&mut self, channel: usize, temp_c: f32) {
        self.temps[channel] = Ok(temp_c);
    }

    pub fn set_all_temps(&mut self, temp_c: f32) {
        self.temps = [Ok(temp_c); CHANNEL_COUNT];
    }

    pub fn disconnect(&mut self, channel: usize) {
        self.temps[channel] = Err(SensorError::Disconnected);
    }

    /// Relay commands issued for one channel, in order.
    pub fn calls_for(&self, channel: usize) -> Vec<bool> {
        self.output_calls
            .iter()
            .filter(|(ch, _)| *ch == channel)
            .map(|(_, level)| *level)
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBusPort for MockHardware {
    fn request_all(&mut self) {
        self.conversions += 1;
    }

    fn read_by_address(&mut self, addr: SensorAddress) -> Result<f32, SensorError> {
        let ch = SENSOR_ROM_CODES
            .iter()
            .position(|rom| SensorAddress(*rom) == addr)
            .expect("unknown ROM code");
        self.temps[ch]
    }
}

impl OutputPort for MockHardware {
    fn set_output(&mut self, channel: usize, engaged: bool) {
        self.outputs[channel] = engaged;
        self.output_calls.push((channel, engaged));
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn phase_changes_for(&self, channel: usize) -> Vec<AppEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::PhaseChanged { channel: ch, .. } if *ch == channel))
            .copied()
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
