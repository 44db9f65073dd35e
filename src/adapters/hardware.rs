//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the shared 1-Wire bus and the heater relay bank, exposing them
//! through [`SensorBusPort`] and [`OutputPort`]. This is the only module
//! in the system that touches actual hardware.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::app::ports::{OutputPort, SensorBusPort};
use crate::drivers::ds18b20::Ds18b20Bus;
use crate::drivers::heater::HeaterBank;
use crate::error::SensorError;
use crate::sensors::SensorAddress;

pub type HeaterPin = PinDriver<'static, AnyOutputPin, Output>;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    bus: Ds18b20Bus<'static>,
    heaters: HeaterBank<HeaterPin>,
}

impl HardwareAdapter {
    pub fn new(bus: Ds18b20Bus<'static>, heaters: HeaterBank<HeaterPin>) -> Self {
        Self { bus, heaters }
    }
}

// ── SensorBusPort implementation ──────────────────────────────

impl SensorBusPort for HardwareAdapter {
    fn request_all(&mut self) {
        self.bus.convert_all();
    }

    fn read_by_address(&mut self, addr: SensorAddress) -> Result<f32, SensorError> {
        self.bus.read_temperature(&addr)
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl OutputPort for HardwareAdapter {
    fn set_output(&mut self, channel: usize, engaged: bool) {
        self.heaters.set(channel, engaged);
    }
}
