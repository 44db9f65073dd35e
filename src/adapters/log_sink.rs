//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A future telemetry or
//! display adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::CHANNEL_LABELS;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::Started => {
                info!("START | all channels Idle, outputs off");
            }
            AppEvent::PhaseChanged { channel, from, to } => {
                info!(
                    "PHASE | ch{} ({}) {} -> {}",
                    channel,
                    CHANNEL_LABELS[channel],
                    from.label(),
                    to.label(),
                );
            }
            AppEvent::OutputChanged { channel, engaged } => {
                info!(
                    "HEAT  | ch{} ({}) {}",
                    channel,
                    CHANNEL_LABELS[channel],
                    if engaged { "on" } else { "off" },
                );
            }
            AppEvent::SensorLost { channel } => {
                warn!(
                    "PROBE | ch{} ({}) lost — control frozen",
                    channel, CHANNEL_LABELS[channel],
                );
            }
            AppEvent::SensorRestored { channel } => {
                info!("PROBE | ch{} ({}) restored", channel, CHANNEL_LABELS[channel]);
            }
        }
    }
}
