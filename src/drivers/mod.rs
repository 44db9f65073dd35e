//! Actuator and bus drivers.

pub mod heater;

#[cfg(feature = "espidf")]
pub mod ds18b20;
