//! Proximity Consensus Simulation Library
//!
//! Vehicles on a wrapped plane that average velocities with nearby peers.
//! Runs headless or with an optional Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
