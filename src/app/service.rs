//! Control service — the per-tick orchestration pipeline.
//!
//! [`ControlService`] wires the two periodic tasks to the shared stores:
//!
//! ```text
//!  SensorBusPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                    │      ControlService      │
//!     OutputPort ◀── │  SensorCache · Channels   │
//!                    └─────────────────────────┘
//! ```
//!
//! The service borrows the [`ParameterStore`] and [`SensorCache`] rather
//! than owning them: the HTTP handlers hold the same references and write
//! parameter updates concurrently with the control loop. Every channel's
//! evaluate-and-commit runs inside that channel's critical section, so an
//! update can never be observed half-applied.

use log::info;

use crate::config::{SystemConfig, CHANNEL_COUNT};
use crate::control::channel::evaluate;
use crate::scheduler::PeriodicTask;
use crate::sensors::SensorCache;
use crate::store::ParameterStore;

use super::events::AppEvent;
use super::ports::{EventSink, OutputPort, SensorBusPort};

/// Orchestrates probe refresh and control evaluation for all channels.
pub struct ControlService<'a> {
    store: &'a ParameterStore,
    cache: &'a SensorCache,
    /// Slow gate: batch probe read.
    sensor_task: PeriodicTask,
    /// Fast gate: state-machine evaluation.
    control_task: PeriodicTask,
    /// Probe connectivity as of the previous refresh, for edge events.
    probe_ok: [bool; CHANNEL_COUNT],
}

impl<'a> ControlService<'a> {
    pub fn new(config: &SystemConfig, store: &'a ParameterStore, cache: &'a SensorCache) -> Self {
        Self {
            store,
            cache,
            sensor_task: PeriodicTask::new(config.sensor_refresh_interval_ms),
            control_task: PeriodicTask::new(config.control_interval_ms),
            probe_ok: [true; CHANNEL_COUNT],
        }
    }

    /// Announce startup. All channels begin Idle with outputs off.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "control service started: {} channels, refresh {}ms, evaluate {}ms",
            CHANNEL_COUNT,
            self.sensor_task.interval_ms(),
            self.control_task.interval_ms()
        );
    }

    /// One pass of the main loop. Polls both periodic gates against the
    /// monotonic clock; nothing here blocks or suspends.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorBusPort + OutputPort),
        sink: &mut impl EventSink,
    ) {
        if self.sensor_task.poll(now_ms).is_some() {
            self.refresh_probes(hw, sink);
        }

        if let Some(elapsed_ms) = self.control_task.poll(now_ms) {
            self.evaluate_channels(now_ms, elapsed_ms, hw, sink);
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn refresh_probes(&mut self, hw: &mut impl SensorBusPort, sink: &mut impl EventSink) {
        self.cache.refresh_all(hw);
        for ch in 0..CHANNEL_COUNT {
            let ok = self.cache.read(ch).valid().is_some();
            if ok != self.probe_ok[ch] {
                let event = if ok {
                    AppEvent::SensorRestored { channel: ch }
                } else {
                    AppEvent::SensorLost { channel: ch }
                };
                sink.emit(&event);
                self.probe_ok[ch] = ok;
            }
        }
    }

    fn evaluate_channels(
        &self,
        now_ms: u64,
        elapsed_ms: u64,
        hw: &mut (impl SensorBusPort + OutputPort),
        sink: &mut impl EventSink,
    ) {
        for ch in 0..CHANNEL_COUNT {
            // A disconnected probe suspends control for its channel: phase,
            // output, and timers stay frozen until a valid reading returns.
            let Some(temp_c) = self.cache.read(ch).valid() else {
                continue;
            };

            let (outcome, engaged) = self.store.with_channel(ch, |state| {
                let outcome = evaluate(ch, state, temp_c, now_ms, elapsed_ms);
                (outcome, state.output_engaged)
            });

            // Re-applied every cycle, not only on crossings, so the relay
            // also converges after an update reset disengaged the state.
            hw.set_output(ch, engaged);

            if let Some(level) = outcome.output_changed {
                sink.emit(&AppEvent::OutputChanged {
                    channel: ch,
                    engaged: level,
                });
            }
            if let Some((from, to)) = outcome.phase_changed {
                sink.emit(&AppEvent::PhaseChanged {
                    channel: ch,
                    from,
                    to,
                });
            }
        }
    }
}
