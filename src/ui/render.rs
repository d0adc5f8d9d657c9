//! Drawing the grid, vehicle markers and annotations

use bevy::prelude::*;

use super::components::{MainCamera, SimWorldResource, VehicleLabel};
use crate::simulation::{Rgb, SimConfig};

const MARKER_RADIUS: f32 = 5.0;
const LABEL_FONT_SIZE: f32 = 11.0;
const LABEL_OFFSET: Vec2 = Vec2::new(10.0, 10.0);
const GRID_COLOR: Rgb = Rgb(50, 50, 50);
const PROXIMITY_COLOR: Rgb = Rgb(255, 0, 0);

fn to_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.0, rgb.1, rgb.2)
}

/// Simulation coordinates have the origin top-left with y down; Bevy's 2D
/// camera is centered with y up.
fn to_screen(config: &SimConfig, x: f64, y: f64) -> Vec2 {
    Vec2::new(
        x as f32 - config.width as f32 / 2.0,
        config.height as f32 / 2.0 - y as f32,
    )
}

/// Spawn the camera and one text annotation per vehicle
pub fn setup_scene(mut commands: Commands, sim_world: Res<SimWorldResource>) {
    commands.spawn((MainCamera, Camera2d));

    let world = &sim_world.0;
    for snapshot in world.snapshots() {
        let anchor = to_screen(world.config(), snapshot.x, snapshot.y) + LABEL_OFFSET;
        commands.spawn((
            VehicleLabel(snapshot.id),
            Text2d::new(snapshot.annotation()),
            TextFont {
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_translation(anchor.extend(1.0)),
        ));
    }
}

/// Background gridlines every `grid_size` units
pub fn draw_grid(mut gizmos: Gizmos, sim_world: Res<SimWorldResource>) {
    let config = sim_world.0.config();
    let color = to_color(GRID_COLOR);
    let (width, height) = (config.width as f64, config.height as f64);

    for x in (0..config.width).step_by(config.grid_size as usize) {
        let x = x as f64;
        gizmos.line_2d(to_screen(config, x, 0.0), to_screen(config, x, height), color);
    }
    for y in (0..config.height).step_by(config.grid_size as usize) {
        let y = y as f64;
        gizmos.line_2d(to_screen(config, 0.0, y), to_screen(config, width, y), color);
    }
}

/// Marker in the status color plus the proximity outline
pub fn draw_vehicles(mut gizmos: Gizmos, sim_world: Res<SimWorldResource>) {
    let world = &sim_world.0;
    let radius = world.config().proximity_radius as f32;
    let outline = to_color(PROXIMITY_COLOR);

    for snapshot in world.snapshots() {
        let center = to_screen(world.config(), snapshot.x, snapshot.y);
        gizmos.circle_2d(center, MARKER_RADIUS, to_color(snapshot.color));
        gizmos.circle_2d(center, radius, outline);
    }
}

/// Keep each annotation next to its vehicle with current values
pub fn sync_labels(
    sim_world: Res<SimWorldResource>,
    mut labels: Query<(&VehicleLabel, &mut Text2d, &mut Transform)>,
) {
    let world = &sim_world.0;
    for (link, mut text, mut transform) in labels.iter_mut() {
        if let Some(vehicle) = world.vehicle(link.0) {
            let snapshot = vehicle.snapshot();
            let anchor = to_screen(world.config(), snapshot.x, snapshot.y) + LABEL_OFFSET;
            transform.translation = anchor.extend(1.0);
            text.0 = snapshot.annotation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_mapping_centers_and_flips_y() {
        let config = SimConfig::default();
        assert_eq!(to_screen(&config, 0.0, 0.0), Vec2::new(-694.0, 384.0));
        assert_eq!(to_screen(&config, 694.0, 384.0), Vec2::ZERO);
        assert_eq!(to_screen(&config, 1388.0, 768.0), Vec2::new(694.0, -384.0));
    }
}
