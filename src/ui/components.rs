//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;

use crate::simulation::{RunReport, SimWorld, VehicleId};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

/// How the windowed run ends and what happens to the data log afterwards
#[derive(Resource, Clone, Default)]
pub struct RunSettings {
    /// Quit on our own after this many ticks
    pub max_ticks: Option<u64>,
    pub report: RunReport,
}

/// Marker for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a text annotation entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLabel(pub VehicleId);
