//! Main simulation world that ties everything together
//!
//! This is the entry point for running the proximity simulation
//! without any Bevy dependencies.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use super::config::SimConfig;
use super::data_log::DataLog;
use super::stats::{proximity_clusters, VelocityStats};
use super::types::{Heading, Position, SimId, VehicleId, VehicleSnapshot, VehicleStatus};
use super::vehicle::SimVehicle;

/// The main simulation world
pub struct SimWorld {
    /// Run configuration, fixed at creation
    config: SimConfig,

    /// All vehicles, in decision order
    vehicles: Vec<SimVehicle>,

    /// Per-tick history of every vehicle
    data_log: DataLog,

    /// Number of ticks completed
    tick: u64,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        let mut world = Self {
            config,
            vehicles: Vec::new(),
            data_log: DataLog::new(),
            tick: 0,
            rng,
        };
        world.populate();
        Ok(world)
    }

    /// Create a world with randomly placed vehicles
    pub fn new(config: SimConfig) -> Result<Self> {
        Self::new_internal(config, None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        Self::new_internal(config, Some(StdRng::seed_from_u64(seed)))
    }

    /// Create a world from hand-placed vehicles.
    ///
    /// The vehicle count in `config` is replaced by `vehicles.len()`.
    pub fn from_vehicles(mut config: SimConfig, vehicles: Vec<SimVehicle>) -> Result<Self> {
        config.vehicle_count = vehicles.len();
        config.validate().context("Invalid simulation config")?;

        let mut seen = HashSet::new();
        for vehicle in &vehicles {
            if !seen.insert(vehicle.id) {
                bail!("Duplicate vehicle id {}", vehicle.id);
            }
        }

        Ok(Self {
            config,
            vehicles,
            data_log: DataLog::new(),
            tick: 0,
            rng: None,
        })
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random heading, using seeded RNG if available
    fn random_heading(&mut self) -> Heading {
        let choice = match &mut self.rng {
            Some(rng) => Heading::ALL.choose(rng),
            None => Heading::ALL.choose(&mut rand::rng()),
        };
        choice.copied().unwrap_or(Heading::East)
    }

    fn populate(&mut self) {
        let count = self.config.vehicle_count;
        self.vehicles.reserve_exact(count);

        for index in 0..count {
            let x = self.random_range(0..self.config.width);
            let y = self.random_range(0..self.config.height);
            let velocity = self.random_range(self.config.initial_velocity.clone());
            let heading = self.random_heading();

            self.vehicles.push(SimVehicle::new(
                VehicleId(SimId(index)),
                Position::new(x as f64, y as f64),
                velocity,
                heading,
            ));
        }

        debug!("Placed {} vehicles", count);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn vehicles(&self) -> &[SimVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn data_log(&self) -> &DataLog {
        &self.data_log
    }

    /// Hand the log over once the run is finished
    pub fn into_data_log(self) -> DataLog {
        self.data_log
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Plain-data view of every vehicle for renderers
    pub fn snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles.iter().map(SimVehicle::snapshot).collect()
    }

    /// Move every vehicle
    fn move_vehicles(&mut self) {
        let (width, height) = (self.config.width_f64(), self.config.height_f64());
        for vehicle in &mut self.vehicles {
            vehicle.move_step(width, height);
        }
    }

    /// Let every vehicle decide, in order.
    ///
    /// Each decision reads the live collection, so a vehicle sees velocities
    /// already changed by vehicles earlier in the order this tick.
    fn decide_vehicles(&mut self) {
        let radius = self.config.proximity_radius;
        for index in 0..self.vehicles.len() {
            let neighborhood = self.vehicles[index].find_neighbors(&self.vehicles, radius);
            self.vehicles[index].decide(neighborhood);
        }
    }

    /// Main simulation tick
    pub fn tick(&mut self) {
        self.tick += 1;
        self.move_vehicles();
        self.decide_vehicles();
        self.data_log.record(self.tick, &self.vehicles);
    }

    /// Run ticks until `max_ticks` is reached or `stop` is set.
    ///
    /// `stop` is checked before every tick. `on_tick` is called after each
    /// tick and before the frame delay. Returns the number of ticks run.
    pub fn run<F>(&mut self, max_ticks: Option<u64>, stop: &AtomicBool, mut on_tick: F) -> u64
    where
        F: FnMut(&SimWorld),
    {
        let frame_interval = self.config.frame_interval();
        let mut ran = 0;

        while max_ticks.is_none_or(|max| ran < max) {
            if stop.load(Ordering::Relaxed) {
                info!("Stop requested after {} ticks", ran);
                break;
            }

            self.tick();
            ran += 1;
            on_tick(self);

            if let Some(interval) = frame_interval {
                std::thread::sleep(interval);
            }
        }

        ran
    }

    pub fn velocity_stats(&self) -> VelocityStats {
        VelocityStats::from_vehicles(&self.vehicles)
    }

    /// Number of proximity groups right now
    pub fn proximity_clusters(&self) -> usize {
        proximity_clusters(&self.vehicles, self.config.proximity_radius)
    }

    /// One-line state summary for periodic logging
    pub fn summary_line(&self) -> String {
        let stats = self.velocity_stats();
        format!(
            "tick {}: {} vehicles, {} adjusting, {} clusters, velocity min {:.3} mean {:.3} max {:.3}",
            self.tick,
            self.vehicles.len(),
            stats.adjusting,
            self.proximity_clusters(),
            stats.min,
            stats.mean,
            stats.max
        )
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let stats = self.velocity_stats();
        println!("=== Proximity Simulation Summary ===");
        println!(
            "Tick: {} ({:.1}s at {} fps)",
            self.tick,
            self.tick as f64 / self.config.fps.max(1) as f64,
            self.config.fps
        );
        println!(
            "Vehicles: {}, Adjusting: {}, Clusters: {}",
            self.vehicles.len(),
            stats.adjusting,
            self.proximity_clusters()
        );
        println!(
            "Velocity: min={:.3} mean={:.3} max={:.3}",
            stats.min, stats.mean, stats.max
        );
        if let (Some(fastest), Some(slowest)) = (stats.fastest, stats.slowest) {
            println!("Fastest: vehicle {}, slowest: vehicle {}", fastest, slowest);
        }
        println!("Log records: {}", self.data_log.len());
    }

    /// ASCII map with one cell per grid square
    pub fn render_map(&self) -> String {
        let grid = self.config.grid_size as usize;
        let cols = (self.config.width as usize).div_ceil(grid);
        let rows = (self.config.height as usize).div_ceil(grid);
        let mut cells = vec![vec!['.'; cols]; rows];

        for vehicle in &self.vehicles {
            let col = ((vehicle.position.x as usize) / grid).min(cols - 1);
            let row = ((vehicle.position.y as usize) / grid).min(rows - 1);
            let mark = match vehicle.status {
                VehicleStatus::AdjustingVelocity => '*',
                VehicleStatus::Moving | VehicleStatus::Normal => 'o',
            };
            cells[row][col] = if cells[row][col] == '.' { mark } else { '#' };
        }

        let mut out = String::with_capacity((cols + 1) * rows);
        for row in &cells {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        println!("\n=== World Map ===");
        println!("Legend: o=Normal, *=Adjusting Velocity, #=Several vehicles, .=Empty");
        println!();
        print!("{}", self.render_map());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            width: 100,
            height: 80,
            vehicle_count: 5,
            grid_size: 20,
            fps: 0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn populate_respects_bounds_and_ranges() {
        let world = SimWorld::new_with_seed(SimConfig::default(), 3).unwrap();
        assert_eq!(world.vehicles().len(), 40);
        for (index, v) in world.vehicles().iter().enumerate() {
            assert_eq!(v.id.index(), index);
            assert!((0.0..1388.0).contains(&v.position.x));
            assert!((0.0..768.0).contains(&v.position.y));
            assert!((1.0..2.0).contains(&v.velocity));
            assert_eq!(v.status, VehicleStatus::Moving);
        }
    }

    #[test]
    fn from_vehicles_rejects_duplicate_ids() {
        let v = SimVehicle::new(VehicleId(SimId(0)), Position::new(0.0, 0.0), 1.0, Heading::East);
        let result = SimWorld::from_vehicles(small_config(), vec![v.clone(), v]);
        assert!(result.is_err());
    }

    #[test]
    fn run_stops_at_max_ticks_and_honors_stop_flag() {
        let mut world = SimWorld::new_with_seed(small_config(), 1).unwrap();
        let stop = AtomicBool::new(false);
        let mut seen = 0;
        let ran = world.run(Some(4), &stop, |_| seen += 1);
        assert_eq!(ran, 4);
        assert_eq!(seen, 4);
        assert_eq!(world.current_tick(), 4);

        stop.store(true, Ordering::Relaxed);
        assert_eq!(world.run(Some(10), &stop, |_| {}), 0);
        assert_eq!(world.data_log().len(), 4 * 5);
    }

    #[test]
    fn run_until_stop_requested_from_callback() {
        let mut world = SimWorld::new_with_seed(small_config(), 2).unwrap();
        let stop = AtomicBool::new(false);
        let ran = world.run(None, &stop, |w| {
            if w.current_tick() == 7 {
                stop.store(true, Ordering::Relaxed);
            }
        });
        assert_eq!(ran, 7);
    }

    #[test]
    fn map_marks_vehicles_by_status() {
        let mut a = SimVehicle::new(VehicleId(SimId(0)), Position::new(5.0, 5.0), 1.0, Heading::East);
        a.status = VehicleStatus::AdjustingVelocity;
        let b = SimVehicle::new(VehicleId(SimId(1)), Position::new(90.0, 70.0), 1.0, Heading::East);
        let world = SimWorld::from_vehicles(small_config(), vec![a, b]).unwrap();
        let map = world.render_map();
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "*....");
        assert_eq!(lines[3], "....o");
    }
}
