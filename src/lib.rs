//! Mash/lauter tun controller library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! tooling. All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod recipe;
pub mod script;
pub mod telemetry;

// Hardware-facing code is generic over embedded-hal, so it compiles (and
// is tested) on the host too.
pub mod adapters;
pub mod drivers;
pub mod sensors;
