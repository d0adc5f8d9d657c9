//! Aggregate statistics over the current vehicle population

use ordered_float::OrderedFloat;
use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;

use super::types::{VehicleId, VehicleStatus};
use super::vehicle::SimVehicle;

/// Velocity spread across the population at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub fastest: Option<VehicleId>,
    pub slowest: Option<VehicleId>,
    /// Vehicles whose last decision adjusted their velocity
    pub adjusting: usize,
}

impl VelocityStats {
    pub fn from_vehicles(vehicles: &[SimVehicle]) -> Self {
        let fastest = vehicles
            .iter()
            .max_by_key(|v| OrderedFloat(v.velocity));
        let slowest = vehicles
            .iter()
            .min_by_key(|v| OrderedFloat(v.velocity));

        let mean = if vehicles.is_empty() {
            0.0
        } else {
            vehicles.iter().map(|v| v.velocity).sum::<f64>() / vehicles.len() as f64
        };

        Self {
            min: slowest.map(|v| v.velocity).unwrap_or_default(),
            max: fastest.map(|v| v.velocity).unwrap_or_default(),
            mean,
            fastest: fastest.map(|v| v.id),
            slowest: slowest.map(|v| v.id),
            adjusting: vehicles
                .iter()
                .filter(|v| v.status == VehicleStatus::AdjustingVelocity)
                .count(),
        }
    }
}

/// Undirected graph with an edge between every pair closer than `radius`
pub fn proximity_graph(vehicles: &[SimVehicle], radius: f64) -> UnGraph<VehicleId, f64> {
    let mut graph = UnGraph::with_capacity(vehicles.len(), 0);
    let nodes: Vec<_> = vehicles.iter().map(|v| graph.add_node(v.id)).collect();

    for (i, a) in vehicles.iter().enumerate() {
        for (j, b) in vehicles.iter().enumerate().skip(i + 1) {
            let distance = a.position.distance(&b.position);
            if distance < radius {
                graph.add_edge(nodes[i], nodes[j], distance);
            }
        }
    }
    graph
}

/// Number of groups of vehicles linked by proximity, isolated vehicles included
pub fn proximity_clusters(vehicles: &[SimVehicle], radius: f64) -> usize {
    connected_components(&proximity_graph(vehicles, radius))
}
