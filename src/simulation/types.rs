//! Core types for the proximity simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

impl VehicleId {
    pub fn index(&self) -> usize {
        self.0 .0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0 .0, f)
    }
}

/// A 2D position on the wrapped plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance. The plane wraps for movement only, so this
    /// does not take the shorter way around the edges.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Wrap both coordinates into `[0, width) x [0, height)`
    pub fn wrapped(&self, width: f64, height: f64) -> Position {
        Position {
            x: wrap_coordinate(self.x, width),
            y: wrap_coordinate(self.y, height),
        }
    }
}

/// Euclidean modulo that never returns `extent` itself.
///
/// `rem_euclid` rounds tiny negative inputs up to exactly `extent`, which would
/// break the half-open bound.
fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Fixed cardinal direction a vehicle travels in.
///
/// Screen convention: +y points down, so South is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::South, Heading::West, Heading::North];

    pub fn degrees(&self) -> u16 {
        match self {
            Heading::East => 0,
            Heading::South => 90,
            Heading::West => 180,
            Heading::North => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.degrees() == degrees)
    }

    /// Unit displacement along this heading
    pub fn unit_vector(&self) -> (f64, f64) {
        match self {
            Heading::East => (1.0, 0.0),
            Heading::South => (0.0, 1.0),
            Heading::West => (-1.0, 0.0),
            Heading::North => (0.0, -1.0),
        }
    }
}

/// An RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const COLOR_BLUE: Rgb = Rgb(0, 0, 255);
pub const COLOR_GREEN: Rgb = Rgb(0, 255, 0);

/// What a vehicle did on its last decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleStatus {
    /// Freshly created, no decision made yet
    #[default]
    Moving,
    /// No neighbors in range
    Normal,
    /// Velocity was pulled toward the neighborhood mean
    AdjustingVelocity,
}

impl VehicleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Moving => "Moving",
            VehicleStatus::Normal => "Normal",
            VehicleStatus::AdjustingVelocity => "Adjusting Velocity",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            VehicleStatus::Moving | VehicleStatus::Normal => COLOR_BLUE,
            VehicleStatus::AdjustingVelocity => COLOR_GREEN,
        }
    }
}

/// Plain-data view of a vehicle for renderers
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub action: &'static str,
    pub heading_degrees: u16,
    pub color: Rgb,
}

impl VehicleSnapshot {
    /// Text annotation drawn next to the vehicle marker
    pub fn annotation(&self) -> String {
        format!(
            "ID: {}, Vel: {:.2}, Action: {}, Dir: {}",
            self.id, self.velocity, self.action, self.heading_degrees
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_coordinates() {
        let p = Position::new(-1.5, -0.25).wrapped(100.0, 50.0);
        assert_eq!(p, Position::new(98.5, 49.75));
    }

    #[test]
    fn wrap_never_returns_extent() {
        let p = Position::new(-1e-20, 100.0).wrapped(100.0, 100.0);
        assert!(p.x < 100.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn heading_degrees_roundtrip() {
        for heading in Heading::ALL {
            assert_eq!(Heading::from_degrees(heading.degrees()), Some(heading));
        }
        assert_eq!(Heading::from_degrees(45), None);
    }

    #[test]
    fn status_labels_and_colors() {
        assert_eq!(VehicleStatus::default().label(), "Moving");
        assert_eq!(VehicleStatus::Normal.color(), COLOR_BLUE);
        assert_eq!(VehicleStatus::AdjustingVelocity.label(), "Adjusting Velocity");
        assert_eq!(VehicleStatus::AdjustingVelocity.color(), COLOR_GREEN);
    }
}
