//! Append-only history of every vehicle's state at the end of every tick

use anyhow::{Context, Result};
use csv::Writer;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::types::VehicleId;
use super::vehicle::SimVehicle;

/// One vehicle's state at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRecord {
    pub tick: u64,
    pub id: VehicleId,
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
}

/// Time series of all vehicles across all ticks
#[derive(Debug, Clone, Default)]
pub struct DataLog {
    records: Vec<SnapshotRecord>,
}

impl DataLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record per vehicle, in collection order
    pub fn record(&mut self, tick: u64, vehicles: &[SimVehicle]) {
        self.records.reserve(vehicles.len());
        self.records
            .extend(vehicles.iter().map(|vehicle| SnapshotRecord {
                tick,
                id: vehicle.id,
                x: vehicle.position.x,
                y: vehicle.position.y,
                velocity: vehicle.velocity,
            }));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    /// Velocity against record index, one series per vehicle id
    pub fn velocity_series(&self) -> BTreeMap<VehicleId, Vec<(usize, f64)>> {
        let mut series: BTreeMap<VehicleId, Vec<(usize, f64)>> = BTreeMap::new();
        for (index, record) in self.records.iter().enumerate() {
            series
                .entry(record.id)
                .or_default()
                .push((index, record.velocity));
        }
        series
    }

    /// Write every record as CSV with a header row
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::from_writer(out);
        writer.write_record(["index", "tick", "id", "x", "y", "velocity"])?;
        for (index, record) in self.records.iter().enumerate() {
            writer.write_record(&[
                index.to_string(),
                record.tick.to_string(),
                record.id.to_string(),
                record.x.to_string(),
                record.y.to_string(),
                record.velocity.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("Failed to write data log to {}", path.display()))
    }

    /// Terminal chart of each vehicle's velocity over its recorded ticks.
    ///
    /// One row per vehicle, `columns` buckets wide, each bucket shaded by the
    /// mean velocity it covers relative to the global min/max.
    pub fn render_velocity_chart(&self, columns: usize) -> String {
        const SHADES: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

        let series = self.velocity_series();
        if series.is_empty() || columns == 0 {
            return String::from("(no data)\n");
        }

        let (lo, hi) = self
            .records
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.velocity), hi.max(r.velocity))
            });
        let span = (hi - lo).max(f64::EPSILON);

        let mut out = format!("Vehicle velocity over time (min {lo:.2}, max {hi:.2})\n");
        for (id, points) in &series {
            let buckets = columns.min(points.len());
            let mut row = String::with_capacity(buckets);
            for bucket in 0..buckets {
                let start = bucket * points.len() / buckets;
                let end = ((bucket + 1) * points.len() / buckets).max(start + 1);
                let slice = &points[start..end];
                let mean = slice.iter().map(|(_, v)| v).sum::<f64>() / slice.len() as f64;
                let level = (((mean - lo) / span) * (SHADES.len() - 1) as f64).round() as usize;
                row.push(SHADES[level.min(SHADES.len() - 1)]);
            }
            let last = points.last().map(|(_, v)| *v).unwrap_or_default();
            out.push_str(&format!("  Vehicle {id:>3} {row} {last:.2}\n"));
        }
        out
    }
}
