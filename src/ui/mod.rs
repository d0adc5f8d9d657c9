//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads plain snapshots from `SimWorld` and draws them with 2D gizmos and text.

mod components;
mod input;
mod render;
mod sync;

use bevy::prelude::*;

pub use components::{RunSettings, SimWorldResource};

use input::handle_input;
use render::{draw_grid, draw_vehicles, setup_scene, sync_labels};
use sync::{check_run_end, publish_on_exit, tick_simulation};

/// Plugin to register all UI systems.
///
/// Expects `SimWorldResource` and `RunSettings` to be inserted by the caller.
pub struct ProximitySimUIPlugin;

impl Plugin for ProximitySimUIPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, setup_scene)
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    draw_grid,
                    draw_vehicles,
                    sync_labels,
                    handle_input,
                    check_run_end,
                ),
            )
            .add_systems(Last, publish_on_exit);
    }
}
