//! Systems that drive the simulation and end the run

use bevy::log::{error, info};
use bevy::prelude::*;

use super::components::{RunSettings, SimWorldResource};

/// System to run one simulation tick per fixed step
pub fn tick_simulation(mut sim_world: ResMut<SimWorldResource>, settings: Res<RunSettings>) {
    let world = &mut sim_world.0;
    if settings
        .max_ticks
        .is_some_and(|max| world.current_tick() >= max)
    {
        return;
    }

    world.tick();

    let fps = u64::from(world.config().fps.max(1));
    if world.current_tick() % fps == 0 {
        info!("{}", world.summary_line());
    }
}

/// Quit once the configured tick limit is reached
pub fn check_run_end(
    sim_world: Res<SimWorldResource>,
    settings: Res<RunSettings>,
    mut exit: MessageWriter<AppExit>,
) {
    if let Some(max) = settings.max_ticks {
        if sim_world.0.current_tick() >= max {
            exit.write(AppExit::Success);
        }
    }
}

/// Hand the data log to the report once, when the app is exiting
pub fn publish_on_exit(
    mut exits: MessageReader<AppExit>,
    sim_world: Res<SimWorldResource>,
    settings: Res<RunSettings>,
    mut published: Local<bool>,
) {
    if exits.read().next().is_none() || *published {
        return;
    }
    *published = true;

    if let Err(e) = settings.report.publish(&sim_world.0) {
        error!("Failed to publish run report: {:#}", e);
    }
}
