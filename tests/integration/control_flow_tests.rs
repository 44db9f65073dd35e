//! End-to-end control-loop scenarios against mock hardware.
//!
//! These drive [`ControlService::tick`] with a simulated monotonic clock,
//! exactly the way the firmware main loop does, and assert on the phase
//! trajectory, relay history, and emitted events.

use crate::mock_hw::{EventLog, MockHardware};

use thermobath::app::events::AppEvent;
use thermobath::app::service::ControlService;
use thermobath::config::{SystemConfig, SENSOR_ROM_CODES};
use thermobath::control::Phase;
use thermobath::sensors::{SensorAddress, SensorCache};
use thermobath::status;
use thermobath::store::{ChannelUpdate, ParameterStore};

fn fixtures() -> (SystemConfig, ParameterStore, SensorCache) {
    let config = SystemConfig::default();
    let store = ParameterStore::new(&config);
    let cache = SensorCache::new(SENSOR_ROM_CODES.map(SensorAddress));
    (config, store, cache)
}

fn hold_ms(store: &ParameterStore, channel: usize, ms: u64) {
    store.apply_update(
        channel,
        &ChannelUpdate {
            hold_duration_ms: Some(ms),
            ..ChannelUpdate::default()
        },
    );
}

// ── Full gelation cycle ───────────────────────────────────────

#[test]
fn full_cycle_idle_hold_cool_idle() {
    let (config, store, cache) = fixtures();
    let mut service = ControlService::new(&config, &store, &cache);
    let mut hw = MockHardware::new();
    let mut log = EventLog::new();
    service.start(&mut log);

    // 1 min hold instead of the default hour; ramp stays 1 °C/min from
    // 60 °C down to 37 °C, so the whole cycle takes ~24 simulated minutes.
    hold_ms(&store, 0, 60_000);
    hw.set_all_temps(61.0);

    let mut cooling_started = None;
    let mut idle_reached = None;
    for now in (0..=26 * 60_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
        let phase = store.snapshot(0).phase;
        if phase == Phase::Cooling && cooling_started.is_none() {
            cooling_started = Some(now);
        }
        if phase == Phase::Idle && cooling_started.is_some() && idle_reached.is_none() {
            idle_reached = Some(now);
        }
    }

    // Phase trajectory, in order, exactly once each.
    assert_eq!(
        log.phase_changes_for(0),
        vec![
            AppEvent::PhaseChanged {
                channel: 0,
                from: Phase::Idle,
                to: Phase::Holding,
            },
            AppEvent::PhaseChanged {
                channel: 0,
                from: Phase::Holding,
                to: Phase::Cooling,
            },
            AppEvent::PhaseChanged {
                channel: 0,
                from: Phase::Cooling,
                to: Phase::Idle,
            },
        ]
    );

    // The ramp ends clamped exactly on the floor.
    assert_eq!(store.params(0).setpoint_c, 37.0);
    assert_eq!(store.snapshot(0).phase, Phase::Idle);

    // 23 °C at 1 °C/min: the ramp takes 23 simulated minutes, give or take
    // f32 rounding across ~2760 decrement steps.
    let cooling_ms = idle_reached.unwrap() - cooling_started.unwrap();
    assert!(
        (cooling_ms as i64 - 23 * 60_000).unsigned_abs() <= 5_000,
        "cooling took {cooling_ms} ms"
    );

    // One batch conversion per 2 s refresh interval over the whole run.
    assert_eq!(hw.conversions, 780);

    // Bath still hotter than the floor band, so the heater stays engaged
    // even though the cycle is over.
    assert!(hw.outputs[0]);

    // All probes were healthy throughout.
    assert!(
        !log
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorLost { .. })),
    );
}

// ── Disconnected probe freezes its channel ────────────────────

#[test]
fn disconnected_probe_never_enters_control() {
    let (config, store, cache) = fixtures();
    let mut service = ControlService::new(&config, &store, &cache);
    let mut hw = MockHardware::new();
    let mut log = EventLog::new();
    service.start(&mut log);

    hw.set_all_temps(61.0);
    hw.disconnect(3);

    for now in (0..=5_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }

    // Channel 3 never saw a relay command and never left Idle.
    assert!(hw.calls_for(3).is_empty());
    assert_eq!(store.snapshot(3).phase, Phase::Idle);
    assert!(log
        .events
        .contains(&AppEvent::SensorLost { channel: 3 }));

    // Its neighbours ran normally.
    assert_eq!(store.snapshot(2).phase, Phase::Holding);
    assert_eq!(store.snapshot(4).phase, Phase::Holding);
    assert!(hw.outputs[2] && hw.outputs[4]);
}

#[test]
fn probe_loss_mid_hold_freezes_state_until_restored() {
    let (config, store, cache) = fixtures();
    let mut service = ControlService::new(&config, &store, &cache);
    let mut hw = MockHardware::new();
    let mut log = EventLog::new();
    service.start(&mut log);

    hw.set_all_temps(61.0);
    for now in (0..=3_900).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    let frozen = store.snapshot(2);
    assert_eq!(frozen.phase, Phase::Holding);
    assert!(frozen.output_engaged);

    // Probe drops out; the stale 61 °C reading is replaced by the sentinel
    // on the next refresh and the channel stops being evaluated.
    hw.disconnect(2);
    let calls_before = hw.calls_for(2).len();
    for now in (4_000..=10_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }

    let snap = store.snapshot(2);
    assert_eq!(snap.phase, Phase::Holding, "phase must freeze, not reset");
    assert_eq!(snap.phase_started_ms, frozen.phase_started_ms);
    assert!(snap.output_engaged, "output holds its last state");
    assert_eq!(hw.calls_for(2).len(), calls_before);

    // Reconnection resumes the same hold without restarting the timer.
    hw.set_temp(2, 61.0);
    for now in (10_100..=13_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    let resumed = store.snapshot(2);
    assert_eq!(resumed.phase, Phase::Holding);
    assert_eq!(resumed.phase_started_ms, frozen.phase_started_ms);
    assert!(log
        .events
        .contains(&AppEvent::SensorRestored { channel: 2 }));
}

// ── Parameter update restarts the cycle ───────────────────────

#[test]
fn update_mid_cooling_resets_channel_and_relay() {
    let (config, store, cache) = fixtures();
    let mut service = ControlService::new(&config, &store, &cache);
    let mut hw = MockHardware::new();
    let mut log = EventLog::new();
    service.start(&mut log);

    // Zero hold: the channel passes straight into Cooling on engagement.
    hold_ms(&store, 0, 0);
    hw.set_all_temps(61.0);
    for now in (0..=5_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    assert_eq!(store.snapshot(0).phase, Phase::Cooling);
    assert!(hw.outputs[0]);

    // The bath cools off; once the 30 °C reading lands in the cache the
    // hysteresis drops the output, but the channel keeps Cooling.
    hw.set_temp(0, 30.0);
    for now in (5_100..=6_500).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    assert_eq!(store.snapshot(0).phase, Phase::Cooling);
    assert!(!hw.outputs[0]);

    // A settings submission arrives between control cycles.
    store.apply_update(
        0,
        &ChannelUpdate {
            setpoint_c: Some(55.0),
            hold_duration_ms: Some(60_000),
            ..ChannelUpdate::default()
        },
    );
    let snap = store.snapshot(0);
    assert_eq!(snap.phase, Phase::Idle);
    assert!(!snap.output_engaged);

    for now in (6_600..=7_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    assert!(!hw.outputs[0]);
    assert_eq!(store.snapshot(0).phase, Phase::Idle);

    // And the new cycle starts from scratch against the new setpoint.
    hw.set_temp(0, 56.0);
    for now in (7_100..=10_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    let restarted = store.snapshot(0);
    assert_eq!(restarted.phase, Phase::Holding);
    assert!(restarted.output_engaged);
    assert_eq!(store.params(0).setpoint_c, 55.0);
}

// ── Status projection over a live run ─────────────────────────

#[test]
fn status_reports_countdown_while_holding() {
    let (config, store, cache) = fixtures();
    let mut service = ControlService::new(&config, &store, &cache);
    let mut hw = MockHardware::new();
    let mut log = EventLog::new();
    service.start(&mut log);

    hold_ms(&store, 0, 60_000);
    hw.set_all_temps(61.0);
    // First valid readings land at the 2 s refresh; the hold starts on the
    // control cycle that fires right after.
    for now in (0..=2_000).step_by(100) {
        service.tick(now, &mut hw, &mut log);
    }
    let snap = store.snapshot(0);
    assert_eq!(snap.phase, Phase::Holding);
    assert_eq!(snap.phase_started_ms, 2_000);

    // Projection is a pure read: asking twice at different instants moves
    // the countdown without touching the state machine.
    let rows = status::project(&store, &cache, 32_000);
    assert_eq!(rows[0].status, "Holding");
    assert_eq!(rows[0].remaining.as_str(), "0:30");
    assert_eq!(rows[0].temp_c, 61.0);

    let rows = status::project(&store, &cache, 47_000);
    assert_eq!(rows[0].remaining.as_str(), "0:15");
    assert_eq!(store.snapshot(0).phase, Phase::Holding);
}
