//! Per-channel state machine: hysteresis output control, hold timing,
//! and the cooling ramp.
//!
//! ```text
//!  IDLE ──[temp ≥ setpoint]──▶ HOLDING
//!    ▲                            │
//!    │                     [hold elapsed]
//!    │                            ▼
//!    └────[setpoint = floor]── COOLING
//! ```
//!
//! The heater output is controlled independently of the phase: it engages
//! whenever the temperature reaches the *live* setpoint and disengages only
//! once the temperature falls below `setpoint - HYSTERESIS_C`, so the relay
//! never chatters while the bath oscillates inside the band. During
//! `Cooling` the live setpoint itself ramps down linearly, dragging the
//! hysteresis band with it.
//!
//! Each call to [`evaluate`] advances one channel by one control cycle.
//! Timing comes from a monotonic millisecond clock supplied by the caller;
//! the ramp decrement uses the *actual* elapsed time since the previous
//! evaluation, so scheduler jitter never accumulates into ramp-rate error
//! over an hours-long cycle.

use log::info;

/// Hysteresis band width (°C), shared by all channels. The output stays in
/// its current state while the temperature sits inside
/// `[setpoint - HYSTERESIS_C, setpoint)`.
pub const HYSTERESIS_C: f32 = 0.5;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Process phase of one channel. Exactly one is active at a time; `Idle` is
/// both the initial phase and the phase reached after a completed cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Holding,
    Cooling,
}

impl Phase {
    /// Status label as reported over the wire.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Holding => "Holding",
            Self::Cooling => "Cooling",
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters and state
// ---------------------------------------------------------------------------

/// User-configurable process parameters for one channel.
///
/// `setpoint_c` is the *live* target: the user sets its baseline and the
/// cooling ramp decrements it in place. The remaining fields are read-only
/// to the controller and read-write to the update path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    /// Live target temperature (°C).
    pub setpoint_c: f32,
    /// Cooling ramp rate (°C per minute).
    pub ramp_c_per_min: f32,
    /// Ramp floor (°C) — the setpoint is clamped here, never below.
    pub floor_c: f32,
    /// Hold duration after the setpoint is first reached (milliseconds).
    pub hold_duration_ms: u64,
}

/// Complete control state of one channel. Owned by the
/// [`ParameterStore`](crate::store::ParameterStore); both the control loop
/// and the update path access it only inside the per-channel critical
/// section, so a torn mix of old and new fields can never be observed.
#[derive(Debug, Clone, Copy)]
pub struct ChannelState {
    pub params: ChannelParams,
    pub phase: Phase,
    /// Mirrors the heater relay; changes only at hysteresis crossings.
    pub output_engaged: bool,
    /// Monotonic timestamp (ms) of the last Idle→Holding or
    /// Holding→Cooling transition.
    pub phase_started_ms: u64,
}

impl ChannelState {
    pub fn new(params: ChannelParams) -> Self {
        Self {
            params,
            phase: Phase::Idle,
            output_engaged: false,
            phase_started_ms: 0,
        }
    }

    /// Full-cycle reset: back to `Idle` with the output disengaged.
    /// Applied as a side effect of every parameter update.
    pub fn reset_cycle(&mut self) {
        self.phase = Phase::Idle;
        self.output_engaged = false;
        self.phase_started_ms = 0;
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// What one evaluation cycle changed, for event emission by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOutcome {
    /// `Some(new_level)` if the output crossed a hysteresis threshold.
    pub output_changed: Option<bool>,
    /// `Some((from, to))` if the phase moved this cycle.
    pub phase_changed: Option<(Phase, Phase)>,
}

/// Advance one channel by one control cycle.
///
/// * `temp_c` — the latest valid cached reading; disconnected channels must
///   be skipped by the caller (their state stays frozen).
/// * `now_ms` — monotonic milliseconds since boot.
/// * `elapsed_ms` — actual wall-clock time since the previous evaluation of
///   *any* channel (the evaluation task runs all channels back to back).
pub fn evaluate(
    channel: usize,
    state: &mut ChannelState,
    temp_c: f32,
    now_ms: u64,
    elapsed_ms: u64,
) -> EvalOutcome {
    let phase_before = state.phase;
    let output_before = state.output_engaged;

    // --- 1. Output control (independent of phase) ---
    //
    // A reading exactly at the setpoint engages the output (>=, not >).
    if temp_c >= state.params.setpoint_c && !state.output_engaged {
        state.output_engaged = true;
        info!("ch{channel}: temp {temp_c:.2} above setpoint, output ON");

        // Crossing the setpoint from Idle starts the hold timer. Crossings
        // during Holding or Cooling are ordinary hysteresis cycling and
        // leave the phase alone.
        if state.phase == Phase::Idle {
            state.phase = Phase::Holding;
            state.phase_started_ms = now_ms;
            info!("ch{channel}: hold phase started");
        }
    } else if temp_c < state.params.setpoint_c - HYSTERESIS_C && state.output_engaged {
        state.output_engaged = false;
        info!("ch{channel}: temp {temp_c:.2} below band, output OFF");
    }

    // --- 2. Hold phase: wall-clock elapsed, regardless of output cycling ---
    if state.phase == Phase::Holding
        && now_ms - state.phase_started_ms >= state.params.hold_duration_ms
    {
        state.phase = Phase::Cooling;
        state.phase_started_ms = now_ms;
        info!("ch{channel}: hold finished, cooling ramp started");
    }

    // --- 3. Cooling ramp: linear decrement, clamped exactly to the floor ---
    if state.phase == Phase::Cooling {
        let p = &mut state.params;
        if p.setpoint_c > p.floor_c {
            let step = p.ramp_c_per_min * (elapsed_ms as f32 / 60_000.0);
            p.setpoint_c = (p.setpoint_c - step).max(p.floor_c);
        }
        // Idle in the same cycle the setpoint first equals the floor.
        if p.setpoint_c <= p.floor_c {
            p.setpoint_c = p.floor_c;
            state.phase = Phase::Idle;
            info!("ch{channel}: cooling finished, reached floor {:.2}", p.floor_c);
        }
    }

    EvalOutcome {
        output_changed: (state.output_engaged != output_before).then_some(state.output_engaged),
        phase_changed: (state.phase != phase_before).then_some((phase_before, state.phase)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
