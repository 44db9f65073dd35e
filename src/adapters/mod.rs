//! Adapters — the outer ring binding port traits to the real world.

pub mod log_sink;
pub mod update_form;

#[cfg(feature = "espidf")]
pub mod hardware;
#[cfg(feature = "espidf")]
pub mod http;
