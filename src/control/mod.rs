//! Control core — the per-channel heat/hold/cool state machine.

pub mod channel;

pub use channel::{ChannelParams, ChannelState, EvalOutcome, Phase, HYSTERESIS_C};
