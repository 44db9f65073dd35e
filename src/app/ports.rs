//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (the OneWire bus, heater relays, event sinks) implement
//! these traits. The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;
use crate::sensors::SensorAddress;

// ───────────────────────────────────────────────────────────────
// Sensor bus port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the shared temperature probe bus.
pub trait SensorBusPort {
    /// Kick off a batch temperature conversion on every probe.
    /// Fire-and-forget; results are collected by `read_by_address`.
    fn request_all(&mut self);

    /// Read the most recent conversion from the probe at `addr`.
    fn read_by_address(&mut self, addr: SensorAddress) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the heater relays.
/// Assumed infallible from the core's perspective.
pub trait OutputPort {
    /// Set the heater relay for `channel` (true = energised).
    fn set_output(&mut self, channel: usize, engaged: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, web
/// status push, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
