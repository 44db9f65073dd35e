//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the orchestration for the thermobath controller:
//! the per-tick pipeline that refreshes the probe cache, advances every
//! channel's state machine, and drives the heater outputs. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
