//! Simulation constants and the run configuration built from them

use anyhow::{bail, Result};
use std::ops::Range;
use std::time::Duration;

/// Canvas width in world units
pub const WIDTH: u32 = 1388;

/// Canvas height in world units
pub const HEIGHT: u32 = 768;

/// Number of vehicles created at startup
pub const VEHICLE_COUNT: usize = 40;

/// Spacing of the background grid
pub const GRID_SIZE: u32 = 40;

/// Two vehicles closer than this are neighbors
pub const PROXIMITY_RADIUS: f64 = 30.0;

/// Ticks per second of wall-clock time
pub const FPS: u32 = 30;

/// Initial velocity is drawn uniformly from this range
pub const INITIAL_VELOCITY: Range<f64> = 1.0..2.0;

/// Fraction of the gap to the neighborhood mean closed by the control step
pub const CONTROL_GAIN: f64 = 0.1;

/// Fixed velocity nudge applied by the adaptation step
pub const ADAPTATION_STEP: f64 = 0.1;

/// Configuration for a simulation run. Fixed once the world is created.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub width: u32,
    pub height: u32,
    pub vehicle_count: usize,
    pub grid_size: u32,
    pub proximity_radius: f64,
    pub fps: u32,
    pub initial_velocity: Range<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            vehicle_count: VEHICLE_COUNT,
            grid_size: GRID_SIZE,
            proximity_radius: PROXIMITY_RADIUS,
            fps: FPS,
            initial_velocity: INITIAL_VELOCITY,
        }
    }
}

impl SimConfig {
    /// Reject configurations the tick logic can't run with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "canvas must have a positive size, got {}x{}",
                self.width,
                self.height
            );
        }
        if self.vehicle_count == 0 {
            bail!("vehicle count must be at least 1");
        }
        if self.grid_size == 0 {
            bail!("grid size must be positive");
        }
        if self.proximity_radius.is_nan() || self.proximity_radius <= 0.0 {
            bail!(
                "proximity radius must be positive, got {}",
                self.proximity_radius
            );
        }
        if self.initial_velocity.is_empty() || self.initial_velocity.start < 0.0 {
            bail!(
                "initial velocity range {:?} must be non-empty and non-negative",
                self.initial_velocity
            );
        }
        Ok(())
    }

    /// Delay between ticks, or `None` when pacing is disabled
    pub fn frame_interval(&self) -> Option<Duration> {
        if self.fps == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / self.fps as f64))
        }
    }

    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vehicle_count, 40);
        assert_eq!((config.width, config.height), (1388, 768));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = SimConfig {
            vehicle_count: 0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());

        config.vehicle_count = 2;
        config.proximity_radius = 0.0;
        assert!(config.validate().is_err());

        config.proximity_radius = 30.0;
        config.initial_velocity = 2.0..2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn frame_interval_follows_fps() {
        let config = SimConfig::default();
        let interval = config.frame_interval().unwrap();
        assert!((interval.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);

        let unpaced = SimConfig {
            fps: 0,
            ..SimConfig::default()
        };
        assert_eq!(unpaced.frame_interval(), None);
    }
}
