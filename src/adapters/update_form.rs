//! Parser for the `/update` form body.
//!
//! The settings page submits one `application/x-www-form-urlencoded` body
//! covering every channel, with the channel index suffixed onto each field
//! name: `threshold3=60.0&cooling3=1.0&lower3=37.0&hold3=60&…`. Blank
//! fields mean "leave unchanged". Hold times arrive in whole minutes and
//! are converted to milliseconds here, at the edge.
//!
//! Pure string work, no I/O, so it is testable off-target.

use crate::config::CHANNEL_COUNT;
use crate::store::ChannelUpdate;

/// Parse a form body into one (possibly empty) update per channel.
/// Unknown fields, malformed values, and out-of-range channel indices are
/// ignored rather than failing the whole submission.
pub fn parse(body: &str) -> [ChannelUpdate; CHANNEL_COUNT] {
    let mut updates: [ChannelUpdate; CHANNEL_COUNT] = Default::default();

    for pair in body.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let Some((field, channel)) = split_key(key) else {
            continue;
        };

        let update = &mut updates[channel];
        match field {
            "threshold" => update.setpoint_c = value.parse().ok(),
            "cooling" => update.ramp_c_per_min = value.parse().ok(),
            "lower" => update.floor_c = value.parse().ok(),
            "hold" => {
                update.hold_duration_ms = value.parse::<u64>().ok().map(|mins| mins * 60_000);
            }
            _ => {}
        }
    }

    updates
}

/// Split `threshold3` into `("threshold", 3)`. `None` when the key has no
/// digit suffix or the index is out of range.
fn split_key(key: &str) -> Option<(&str, usize)> {
    let digits_at = key.find(|c: char| c.is_ascii_digit())?;
    let channel: usize = key[digits_at..].parse().ok()?;
    if channel >= CHANNEL_COUNT {
        return None;
    }
    Some((&key[..digits_at], channel))
}
