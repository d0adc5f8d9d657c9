//! End-of-run reporting: final statistics and hand-off of the data log

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use super::world::SimWorld;

/// What to do with the data log once the run loop ends
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Write the full log as CSV here
    pub log_csv: Option<PathBuf>,
    /// Print the per-vehicle velocity chart to stdout
    pub chart: bool,
    /// Width of the chart in buckets
    pub chart_columns: usize,
}

impl RunReport {
    /// Log final statistics, then export and/or chart the data log
    pub fn publish(&self, world: &SimWorld) -> Result<()> {
        let stats = world.velocity_stats();
        let log = world.data_log();

        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks run: {}", world.current_tick());
        info!("Vehicles: {}", world.vehicles().len());
        info!("Adjusting vehicles: {}", stats.adjusting);
        info!("Proximity clusters: {}", world.proximity_clusters());
        info!(
            "Final velocity: min {:.3}, mean {:.3}, max {:.3}",
            stats.min, stats.mean, stats.max
        );
        info!("Log records: {}", log.len());

        if let Some(path) = &self.log_csv {
            log.export_csv(path)?;
            info!("Data log written to {}", path.display());
        }

        if self.chart {
            print!("{}", log.render_velocity_chart(self.chart_columns.max(1)));
        }

        Ok(())
    }
}
