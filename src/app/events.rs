//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them — log to serial, count,
//! publish, etc.

use crate::control::Phase;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The control service has started.
    Started,

    /// A channel's process phase moved.
    PhaseChanged {
        channel: usize,
        from: Phase,
        to: Phase,
    },

    /// A channel's heater output crossed a hysteresis threshold.
    OutputChanged { channel: usize, engaged: bool },

    /// A channel's probe stopped answering; its control state is frozen.
    SensorLost { channel: usize },

    /// A previously lost probe is reporting again.
    SensorRestored { channel: usize },
}
