//! Vehicle movement and decision logic
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::trace;

use super::config::{ADAPTATION_STEP, CONTROL_GAIN};
use super::types::{Heading, Position, VehicleId, VehicleSnapshot, VehicleStatus};

/// Peers found within the proximity radius of a vehicle, in collection order.
///
/// Velocities are read at discovery time. Nothing else mutates the collection
/// between discovery and the owning vehicle's decision, so they are the peers'
/// current velocities for the whole decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    members: Vec<(VehicleId, f64)>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    /// Arithmetic mean of the neighbors' velocities, `None` when empty
    pub fn mean_velocity(&self) -> Option<f64> {
        if self.members.is_empty() {
            return None;
        }
        let sum: f64 = self.members.iter().map(|(_, v)| v).sum();
        Some(sum / self.members.len() as f64)
    }
}

impl FromIterator<(VehicleId, f64)> for Neighborhood {
    fn from_iter<I: IntoIterator<Item = (VehicleId, f64)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Damped move toward `mean`, closing `CONTROL_GAIN` of the gap
fn control(velocity: f64, mean: f64) -> f64 {
    velocity + (mean - velocity) * CONTROL_GAIN
}

/// Fixed nudge toward `mean`; no change when exactly equal
fn adapt(velocity: f64, mean: f64) -> f64 {
    if velocity < mean {
        velocity + ADAPTATION_STEP
    } else if velocity > mean {
        velocity - ADAPTATION_STEP
    } else {
        velocity
    }
}

/// A vehicle in the simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub position: Position,
    pub velocity: f64,
    pub heading: Heading,
    pub status: VehicleStatus,
    /// Neighbors found on the last decision
    pub neighbors: Vec<VehicleId>,
}

impl SimVehicle {
    pub fn new(id: VehicleId, position: Position, velocity: f64, heading: Heading) -> Self {
        Self {
            id,
            position,
            velocity,
            heading,
            status: VehicleStatus::default(),
            neighbors: Vec::new(),
        }
    }

    /// Advance one step along the heading and wrap onto the plane
    pub fn move_step(&mut self, width: f64, height: f64) {
        let (dx, dy) = self.heading.unit_vector();
        let moved = Position::new(
            self.position.x + dx * self.velocity,
            self.position.y + dy * self.velocity,
        );
        self.position = moved.wrapped(width, height);
    }

    /// Every other vehicle strictly closer than `radius`, in collection order
    pub fn find_neighbors(&self, vehicles: &[SimVehicle], radius: f64) -> Neighborhood {
        vehicles
            .iter()
            .filter(|other| other.id != self.id)
            .filter(|other| self.position.distance(&other.position) < radius)
            .map(|other| (other.id, other.velocity))
            .collect()
    }

    /// Apply the consensus, control and adaptation steps for this tick.
    ///
    /// Control and adaptation each recompute the mean over the same
    /// neighborhood. After consensus they leave the velocity unchanged unless
    /// rounding makes the comparison differ.
    pub fn decide(&mut self, neighborhood: Neighborhood) {
        self.neighbors = neighborhood.ids().collect();

        let Some(mean) = neighborhood.mean_velocity() else {
            self.status = VehicleStatus::Normal;
            return;
        };

        let before = self.velocity;

        // Consensus: replace outright, own velocity is discarded
        self.velocity = mean;

        if let Some(mean) = neighborhood.mean_velocity() {
            self.velocity = control(self.velocity, mean);
        }

        if let Some(mean) = neighborhood.mean_velocity() {
            self.velocity = adapt(self.velocity, mean);
        }

        self.velocity = self.velocity.max(0.0);
        self.status = VehicleStatus::AdjustingVelocity;

        trace!(
            "vehicle {} adjusted {:.3} -> {:.3} with {} neighbors",
            self.id,
            before,
            self.velocity,
            neighborhood.len()
        );
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            velocity: self.velocity,
            action: self.status.label(),
            heading_degrees: self.heading.degrees(),
            color: self.status.color(),
        }
    }
}
