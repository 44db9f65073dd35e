//! Update atomicity under concurrent access.
//!
//! The firmware shares the [`ParameterStore`] between the control loop and
//! the httpd task. On the host, `critical-section/std` backs the
//! per-channel mutexes, so real threads exercise the same locking the
//! target uses. The writer always submits *correlated* field pairs; any
//! torn observation would break the correlation.

use std::thread;

use thermobath::config::SystemConfig;
use thermobath::control::channel::evaluate;
use thermobath::control::Phase;
use thermobath::store::{ChannelUpdate, ParameterStore};

/// Initial defaults give setpoint − floor = 23; every update writes a pair
/// with setpoint − floor = 20. Both differences are exact in f32.
fn correlated(diff: f32) -> bool {
    diff == 23.0 || diff == 20.0
}

#[test]
fn reader_never_observes_torn_update() {
    let store = ParameterStore::new(&SystemConfig::default());

    thread::scope(|s| {
        s.spawn(|| {
            for k in 0..2_000u32 {
                let setpoint = 40.0 + (k % 50) as f32;
                store.apply_update(
                    0,
                    &ChannelUpdate {
                        setpoint_c: Some(setpoint),
                        floor_c: Some(setpoint - 20.0),
                        ..ChannelUpdate::default()
                    },
                );
            }
        });

        s.spawn(|| {
            for _ in 0..20_000 {
                let p = store.params(0);
                assert!(
                    correlated(p.setpoint_c - p.floor_c),
                    "torn read: setpoint={} floor={}",
                    p.setpoint_c,
                    p.floor_c
                );
            }
        });
    });
}

#[test]
fn evaluation_and_updates_interleave_consistently() {
    let store = ParameterStore::new(&SystemConfig::default());

    thread::scope(|s| {
        s.spawn(|| {
            for k in 0..2_000u32 {
                let setpoint = 40.0 + (k % 50) as f32;
                store.apply_update(
                    1,
                    &ChannelUpdate {
                        setpoint_c: Some(setpoint),
                        floor_c: Some(setpoint - 20.0),
                        ..ChannelUpdate::default()
                    },
                );
            }
        });

        // A control loop evaluating a cold bath: the channel stays Idle and
        // the setpoint is never consumed by a ramp, so the pair correlation
        // must hold before and after every single evaluation.
        s.spawn(|| {
            let mut now = 0u64;
            for _ in 0..20_000 {
                now += 500;
                store.with_channel(1, |state| {
                    evaluate(1, state, 0.0, now, 500);
                    assert!(correlated(state.params.setpoint_c - state.params.floor_c));
                    assert_eq!(state.phase, Phase::Idle);
                    assert!(!state.output_engaged);
                });
            }
        });
    });
}

#[test]
fn update_during_active_hold_resets_atomically() {
    let store = ParameterStore::new(&SystemConfig::default());

    // Drive channel 2 into an engaged hold.
    store.with_channel(2, |state| {
        evaluate(2, state, 61.0, 500, 500);
        assert_eq!(state.phase, Phase::Holding);
    });

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..1_000 {
                store.apply_update(2, &ChannelUpdate::default());
            }
        });

        // A post-update snapshot must never pair `Idle` with a still-running
        // hold: the reset writes phase, output, and timer in one section.
        s.spawn(|| {
            for _ in 0..10_000 {
                let snap = store.snapshot(2);
                if snap.phase == Phase::Idle {
                    assert!(!snap.output_engaged);
                    assert_eq!(snap.phase_started_ms, 0);
                }
            }
        });
    });
}
