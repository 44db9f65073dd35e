//! Shared per-channel parameter and state store.
//!
//! Two execution contexts touch a channel's data: the control loop's
//! read/modify/write evaluation and the HTTP update handler. Each channel
//! sits behind its own blocking mutex, so an update is atomic with respect
//! to a concurrently running evaluation — an evaluation can never observe a
//! half-applied update, and the two contexts interleave freely across
//! *different* channels.
//!
//! Raw field access is deliberately not exposed; everything goes through
//! [`ParameterStore::with_channel`] or the typed accessors, which keeps the
//! critical-section discipline enforceable at the API boundary.
//!
//! Applying any update — even one that supplies no fields — resets the
//! channel to `Idle` with the output disengaged. This is a deliberate
//! full-cycle restart so new parameters always take effect from a clean
//! state, not an error condition. No range validation is performed;
//! out-of-range values produce a degenerate but well-defined trajectory.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use log::info;

use crate::config::{SystemConfig, CHANNEL_COUNT};
use crate::control::{ChannelParams, ChannelState};

type Slot = Mutex<CriticalSectionRawMutex, RefCell<ChannelState>>;

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// A partial parameter update: only supplied fields change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelUpdate {
    pub setpoint_c: Option<f32>,
    pub ramp_c_per_min: Option<f32>,
    pub floor_c: Option<f32>,
    pub hold_duration_ms: Option<u64>,
}

impl ChannelUpdate {
    /// True if no field is supplied. The update still triggers the
    /// full-cycle reset when applied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// ParameterStore
// ---------------------------------------------------------------------------

/// Owns the complete control state of every channel.
pub struct ParameterStore {
    channels: [Slot; CHANNEL_COUNT],
}

impl ParameterStore {
    /// Create the store with every channel at the configured defaults,
    /// in `Idle` with the output disengaged.
    pub fn new(config: &SystemConfig) -> Self {
        let params = ChannelParams {
            setpoint_c: config.default_setpoint_c,
            ramp_c_per_min: config.default_ramp_c_per_min,
            floor_c: config.default_floor_c,
            hold_duration_ms: u64::from(config.default_hold_mins) * 60_000,
        };
        Self {
            channels: core::array::from_fn(|_| Mutex::new(RefCell::new(ChannelState::new(params)))),
        }
    }

    /// Run `f` inside the channel's critical section. This is the only way
    /// to mutate channel state; the control loop runs its entire
    /// evaluate-and-commit cycle inside one call.
    pub fn with_channel<R>(&self, channel: usize, f: impl FnOnce(&mut ChannelState) -> R) -> R {
        self.channels[channel].lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Copy of the channel's current parameters.
    pub fn params(&self, channel: usize) -> ChannelParams {
        self.with_channel(channel, |s| s.params)
    }

    /// Consistent point-in-time copy of the channel's full state
    /// (parameters, phase, output, phase timestamp).
    pub fn snapshot(&self, channel: usize) -> ChannelState {
        self.with_channel(channel, |s| *s)
    }

    /// Atomically apply a partial update and perform the full-cycle reset.
    pub fn apply_update(&self, channel: usize, update: &ChannelUpdate) {
        self.with_channel(channel, |s| {
            if let Some(v) = update.setpoint_c {
                s.params.setpoint_c = v;
            }
            if let Some(v) = update.ramp_c_per_min {
                s.params.ramp_c_per_min = v;
            }
            if let Some(v) = update.floor_c {
                s.params.floor_c = v;
            }
            if let Some(v) = update.hold_duration_ms {
                s.params.hold_duration_ms = v;
            }
            s.reset_cycle();
        });
        info!("ch{channel}: parameters updated, cycle reset to Idle");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
