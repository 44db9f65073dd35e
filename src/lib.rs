//! Thermobath firmware library.
//!
//! Hexagonal layout: `control`, `store`, `sensors`, `scheduler`, and
//! `status` are pure logic and build on any host; `app` defines the port
//! traits and the orchestrating service; `adapters` and `drivers` hold the
//! hardware-facing side, with everything ESP-IDF-specific guarded by the
//! `espidf` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod status;
pub mod store;

pub mod pins;

pub mod adapters;
pub mod drivers;
