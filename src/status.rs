//! Status projection — derives the per-channel report served at `/data`.
//!
//! Pure read-only derivation, callable at any time from the HTTP handler
//! without side effects: each channel reports its last temperature (the
//! −127 °C sentinel when disconnected), its phase label, and — during
//! `Holding` only — the remaining hold time as `M:SS`.

use core::fmt::Write as _;

use serde::Serialize;

use crate::config::CHANNEL_COUNT;
use crate::control::Phase;
use crate::sensors::SensorCache;
use crate::store::ParameterStore;

/// Fits `u32::MAX` minutes plus `:SS`.
type TimeString = heapless::String<16>;

/// One row of the status report, serialized with the wire field names the
/// web page expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStatus {
    /// Last cached reading (°C); −127.0 when the probe is disconnected.
    #[serde(rename = "temp")]
    pub temp_c: f32,
    /// `M:SS` while Holding, `-` otherwise.
    #[serde(rename = "time_rem")]
    pub remaining: TimeString,
    /// `Idle`, `Holding`, or `Cooling`.
    pub status: &'static str,
}

/// Project the live state of every channel at `now_ms`.
pub fn project(
    store: &ParameterStore,
    cache: &SensorCache,
    now_ms: u64,
) -> [ChannelStatus; CHANNEL_COUNT] {
    core::array::from_fn(|ch| {
        let snap = store.snapshot(ch);
        let remaining = match snap.phase {
            Phase::Holding => {
                let elapsed = now_ms.saturating_sub(snap.phase_started_ms);
                // Floored at zero: an expired-but-still-holding channel
                // shows 0:00 until the next control cycle moves it on.
                format_remaining(snap.params.hold_duration_ms.saturating_sub(elapsed))
            }
            Phase::Idle | Phase::Cooling => no_remaining(),
        };
        ChannelStatus {
            temp_c: cache.read(ch).wire_value(),
            remaining,
            status: snap.phase.label(),
        }
    })
}

fn no_remaining() -> TimeString {
    let mut s = TimeString::new();
    let _ = s.push('-');
    s
}

/// Format a millisecond count as `M:SS` (whole-second resolution).
fn format_remaining(ms: u64) -> TimeString {
    let secs = ms / 1000;
    let mut s = TimeString::new();
    let _ = write!(s, "{}:{:02}", secs / 60, secs % 60);
    s
}
