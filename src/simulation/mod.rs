//! Standalone proximity simulation module
//!
//! This module contains all the core simulation logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up a window.

mod config;
mod data_log;
mod report;
mod stats;
mod types;
mod vehicle;
mod world;

pub use config::{
    SimConfig, ADAPTATION_STEP, CONTROL_GAIN, FPS, GRID_SIZE, HEIGHT, INITIAL_VELOCITY,
    PROXIMITY_RADIUS, VEHICLE_COUNT, WIDTH,
};
pub use data_log::{DataLog, SnapshotRecord};
pub use report::RunReport;
pub use stats::{proximity_clusters, proximity_graph, VelocityStats};
pub use types::{
    Heading, Position, Rgb, SimId, VehicleId, VehicleSnapshot, VehicleStatus, COLOR_BLUE,
    COLOR_GREEN,
};
pub use vehicle::{Neighborhood, SimVehicle};
pub use world::SimWorld;
