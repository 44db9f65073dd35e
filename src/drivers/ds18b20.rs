//! Bit-banged 1-Wire bus for DS18B20 probes.
//!
//! All probes share one open-drain GPIO. A conversion is kicked off for
//! every probe at once (`SKIP ROM` + `CONVERT T`), then each scratchpad is
//! read back by ROM address on the next refresh. The 2 s refresh interval
//! comfortably exceeds the 750 ms worst-case 12-bit conversion time, so
//! the driver never busy-waits on a conversion.
//!
//! Timings follow the DS18B20 datasheet; `Ets::delay_us` busy-spins, which
//! is the only way to hit the 6–60 µs slot widths from non-IRQ context.

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, InputOutput, PinDriver};

use crate::error::{Error, Result, SensorError};
use crate::sensors::SensorAddress;

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_MATCH_ROM: u8 = 0x55;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Shared 1-Wire bus on a single open-drain pin.
pub struct Ds18b20Bus<'d> {
    pin: PinDriver<'d, AnyIOPin, InputOutput>,
}

impl<'d> Ds18b20Bus<'d> {
    pub fn new(pin: AnyIOPin) -> Result<Self> {
        let mut pin = PinDriver::input_output_od(pin)
            .map_err(|_| Error::Init("onewire pin configuration failed"))?;
        // Released: external pull-up holds the bus high.
        pin.set_high()
            .map_err(|_| Error::Init("onewire bus release failed"))?;
        Ok(Self { pin })
    }

    /// Start a temperature conversion on every probe at once. No-op when
    /// nothing answers the reset pulse.
    pub fn convert_all(&mut self) {
        if self.reset() {
            self.write_byte(CMD_SKIP_ROM);
            self.write_byte(CMD_CONVERT_T);
        }
    }

    /// Read one probe's scratchpad and decode the temperature in °C.
    pub fn read_temperature(
        &mut self,
        addr: &SensorAddress,
    ) -> core::result::Result<f32, SensorError> {
        if !self.reset() {
            return Err(SensorError::BusTimeout);
        }
        self.write_byte(CMD_MATCH_ROM);
        for byte in addr.0 {
            self.write_byte(byte);
        }
        self.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; 9];
        for byte in &mut scratchpad {
            *byte = self.read_byte();
        }

        // A probe pulled mid-read leaves the bus floating high: all ones.
        if scratchpad == [0xFF; 9] {
            return Err(SensorError::Disconnected);
        }
        if crc8(&scratchpad[..8]) != scratchpad[8] {
            return Err(SensorError::CrcMismatch);
        }

        let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
        Ok(f32::from(raw) / 16.0)
    }

    // ── Wire primitives ───────────────────────────────────────

    /// Reset pulse. Returns true when at least one probe answered with a
    /// presence pulse.
    fn reset(&mut self) -> bool {
        let _ = self.pin.set_low();
        Ets::delay_us(480);
        let _ = self.pin.set_high();
        Ets::delay_us(70);
        let present = self.pin.is_low();
        Ets::delay_us(410);
        present
    }

    fn write_bit(&mut self, bit: bool) {
        let _ = self.pin.set_low();
        if bit {
            Ets::delay_us(6);
            let _ = self.pin.set_high();
            Ets::delay_us(64);
        } else {
            Ets::delay_us(60);
            let _ = self.pin.set_high();
            Ets::delay_us(10);
        }
    }

    fn read_bit(&mut self) -> bool {
        let _ = self.pin.set_low();
        Ets::delay_us(6);
        let _ = self.pin.set_high();
        Ets::delay_us(9);
        let bit = self.pin.is_high();
        Ets::delay_us(55);
        bit
    }

    fn write_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0);
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit() {
                byte |= 1 << i;
            }
        }
        byte
    }
}

/// Dallas CRC-8, polynomial x^8 + x^5 + x^4 + 1, LSB-first.
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}
