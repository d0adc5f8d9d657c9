use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use proximity_sim::simulation::{self, RunReport, SimConfig, SimWorld};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "proximity_sim")]
#[command(about = "Vehicles averaging velocity with nearby peers, headless or with a UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of ticks to run; runs until quit (`q` + Enter, Ctrl-C, SIGTERM, or closing the window) when omitted
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for reproducible vehicle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Number of vehicles
    #[arg(long, default_value_t = simulation::VEHICLE_COUNT)]
    vehicles: usize,

    /// Ticks per second; 0 runs headless ticks without any delay (not allowed with --ui)
    #[arg(long, default_value_t = simulation::FPS)]
    fps: u32,

    /// Write the data log as CSV when the run ends
    #[arg(long)]
    log_csv: Option<PathBuf>,

    /// Print a per-vehicle velocity chart when the run ends
    #[arg(long)]
    chart: bool,

    /// Print the ASCII map alongside each headless summary
    #[arg(long)]
    map: bool,

    /// Ticks between headless summaries; defaults to one simulated second, or FPS ticks when unpaced
    #[arg(long)]
    summary_every: Option<u64>,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            vehicle_count: self.vehicles,
            fps: self.fps,
            ..SimConfig::default()
        }
    }

    fn report(&self) -> RunReport {
        RunReport {
            log_csv: self.log_csv.clone(),
            chart: self.chart,
            chart_columns: 60,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ui && self.fps == 0 {
            bail!("--fps 0 disables pacing and is only valid for headless runs; pass a positive --fps with --ui");
        }
        Ok(())
    }

    /// Ticks between headless summary lines
    fn summary_interval(&self) -> u64 {
        let default = if self.fps == 0 {
            u64::from(simulation::FPS)
        } else {
            u64::from(self.fps)
        };
        self.summary_every.unwrap_or(default).max(1)
    }

    fn build_world(&self) -> Result<SimWorld> {
        let config = self.config();
        match self.seed {
            Some(seed) => SimWorld::new_with_seed(config, seed),
            None => SimWorld::new(config),
        }
        .context("Failed to create simulation world")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    if cli.ui {
        run_with_ui(&cli)
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        run_headless(&cli)
    }
}

/// Watch stdin for `q` so an open-ended headless run can be stopped cleanly
fn spawn_quit_listener(stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    stop.store(true, Ordering::Relaxed);
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        warn!("stdin closed; stop the run with Ctrl-C or SIGTERM");
    });
}

/// SIGINT and SIGTERM set the stop flag so the run ends after the current tick
fn install_signal_handler(stop: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::Relaxed);
    })
    .context("Failed to install signal handler")
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let mut world = cli.build_world()?;
    let config = world.config().clone();

    info!("Running proximity simulation in headless mode...");
    info!(
        "Vehicles: {}, canvas: {}x{}, radius: {}, fps: {}",
        config.vehicle_count, config.width, config.height, config.proximity_radius, config.fps
    );
    match cli.ticks {
        Some(ticks) => info!("Ticks: {}", ticks),
        None => info!("Running until quit (type q and press Enter, or send Ctrl-C / SIGTERM)"),
    }

    let stop = Arc::new(AtomicBool::new(false));
    install_signal_handler(Arc::clone(&stop))?;
    if cli.ticks.is_none() {
        spawn_quit_listener(Arc::clone(&stop));
    }

    if cli.map {
        world.print_summary();
        world.draw_map();
    }

    let summary_every = cli.summary_interval();

    world.run(cli.ticks, &stop, |world| {
        if world.current_tick() % summary_every == 0 {
            info!("{}", world.summary_line());
            if cli.map {
                world.draw_map();
            }
        }
    });

    if cli.map {
        println!("=== Final State ===");
        world.print_summary();
        world.draw_map();
    }

    cli.report().publish(&world)
}

#[cfg(feature = "ui")]
fn run_with_ui(cli: &Cli) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use proximity_sim::ui::{ProximitySimUIPlugin, RunSettings, SimWorldResource};

    let world = cli.build_world()?;
    let config = world.config().clone();

    println!("Starting Proximity Sim UI...");
    println!("  ESC - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,proximity_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Grid Road Map Autonomous Vehicle Simulation".into(),
                        resolution: (config.width, config.height).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(Time::<Fixed>::from_hz(f64::from(config.fps)))
        .insert_resource(SimWorldResource(world))
        .insert_resource(RunSettings {
            max_ticks: cli.ticks,
            report: cli.report(),
        })
        .add_plugins(ProximitySimUIPlugin)
        .run();

    Ok(())
}

#[cfg(not(feature = "ui"))]
fn run_with_ui(_cli: &Cli) -> Result<()> {
    anyhow::bail!("UI feature is not enabled. Rebuild with --features ui")
}
