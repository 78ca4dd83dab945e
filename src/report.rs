//! Results reporting
//!
//! Turns a [`SimulationResults`] snapshot into the human-readable summary,
//! derives utilization-based recommendations, and writes the results file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::simulation::{SimulationResult, SimulationResults};
use crate::types::{OutputFormat, StationKind};

/// Utilization above which a station is reported as a bottleneck, percent
pub const BOTTLENECK_UTILIZATION: f64 = 80.0;

const RULE_WIDTH: usize = 80;

/// Assessment of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Station assessed
    pub station: StationKind,
    /// Utilization over the measurement window, percent
    pub utilization: f64,
    /// Whether utilization exceeded the bottleneck limit
    pub is_bottleneck: bool,
    /// Machine count worth trying next, when a bottleneck
    pub suggested_machines: Option<usize>,
    /// Longest queue observed
    pub max_queue_length: usize,
    /// Mean wait before service, minutes
    pub avg_wait_time: f64,
}

impl Recommendation {
    /// Assess one station of a run
    pub fn for_station(results: &SimulationResults, station: StationKind) -> Self {
        let metrics = results.station(station);
        let utilization = results.utilization(station);
        let is_bottleneck = utilization > BOTTLENECK_UTILIZATION;

        Self {
            station,
            utilization,
            is_bottleneck,
            suggested_machines: is_bottleneck.then(|| metrics.machines + 1),
            max_queue_length: metrics.max_queue_length,
            avg_wait_time: metrics.avg_wait_time(),
        }
    }

    fn render(&self, out: &mut String) {
        match self.suggested_machines {
            Some(machines) => {
                out.push_str(&format!(
                    "\n❌ BOTTLENECK: {} Station (Utilization: {:.2}%)\n",
                    self.station, self.utilization
                ));
                out.push_str(&format!(
                    "   → Consider adding a {} {} machine\n",
                    ordinal(machines),
                    self.station.to_string().to_lowercase()
                ));
                out.push_str(&format!("   → Current max queue: {} cars\n", self.max_queue_length));
                out.push_str(&format!("   → Current avg wait: {:.2} min\n", self.avg_wait_time));
            }
            None => {
                out.push_str(&format!(
                    "\n✓ {} Station is OK (Utilization: {:.2}%)\n",
                    self.station, self.utilization
                ));
            }
        }
    }
}

/// Recommendations for every station, in conveyor order
pub fn recommendations(results: &SimulationResults) -> Vec<Recommendation> {
    StationKind::ALL.iter().map(|&kind| Recommendation::for_station(results, kind)).collect()
}

/// `2nd`, `3rd`, `11th`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// The results summary shown after a run
pub fn render_results(results: &SimulationResults) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", heavy));
    out.push_str("PAINT SHOP CONVEYOR SYSTEM SIMULATION - RESULTS\n");
    out.push_str(&format!("{}\n", heavy));

    out.push_str(&format!(
        "\nSimulation Duration: {} minutes ({:.1} hours)\n",
        results.shift_duration,
        results.shift_duration / 60.0
    ));
    out.push_str(&format!("Final Clock: {:.1} minutes\n", results.elapsed_time));
    out.push_str(&format!("Cars Generated: {}\n", results.cars_generated));
    out.push_str(&format!("Total Cars Completed: {}\n", results.total_cars));
    if results.cars_in_system > 0 {
        out.push_str(&format!("Cars Still In System: {}\n", results.cars_in_system));
    }
    match results.avg_system_time {
        Some(avg) => out.push_str(&format!("Average System Time per Car: {:.2} minutes\n", avg)),
        None => out.push_str("Average System Time per Car: N/A (No cars completed)\n"),
    }

    for (number, kind) in StationKind::ALL.iter().enumerate() {
        let metrics = results.station(*kind);
        out.push_str(&format!("\n{}\n", light));
        out.push_str(&format!("STATION {}: {}\n", number + 1, kind.title()));
        out.push_str(&format!("{}\n", light));
        out.push_str(&format!("Number of Machines: {}\n", metrics.machines));
        out.push_str(&format!("Utilization: {:.2}%\n", results.utilization(*kind)));
        out.push_str(&format!("Max Queue Length: {} cars\n", metrics.max_queue_length));
        out.push_str(&format!("Average Wait Time: {:.2} minutes\n", metrics.avg_wait_time()));
        out.push_str(&format!(
            "Average Processing Time: {:.2} minutes\n",
            metrics.avg_processing_time()
        ));
        out.push_str(&format!("Total Cars Processed: {}\n", metrics.cars_processed()));
    }

    out.push_str(&format!("\n{}\n", light));
    out.push_str("BOTTLENECK ANALYSIS\n");
    out.push_str(&format!("{}\n", light));
    out.push_str(&format!("Total Alerts Triggered: {}\n", results.alert_count));
    let (busiest, utilization) = results.most_utilized();
    out.push_str(&format!("Most Utilized Station: {} ({:.2}%)\n", busiest, utilization));

    out.push_str(&format!("\n{}\n", heavy));
    out
}

/// The optimization recommendations block
pub fn render_recommendations(results: &SimulationResults) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", heavy));
    out.push_str("OPTIMIZATION RECOMMENDATIONS\n");
    out.push_str(&format!("{}\n", heavy));
    for recommendation in recommendations(results) {
        recommendation.render(&mut out);
    }
    out.push_str(&format!("\n{}\n", heavy));
    out
}

#[derive(Serialize)]
struct ResultsDocument<'a> {
    #[serde(flatten)]
    results: &'a SimulationResults,
    recommendations: Vec<Recommendation>,
}

/// Write the results file in the requested format, creating parent directories
pub fn write_results<P: AsRef<Path>>(
    results: &SimulationResults,
    path: P,
    format: OutputFormat,
) -> SimulationResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    match format {
        OutputFormat::Text => {
            writer.write_all(render_results(results).as_bytes())?;
            writer.write_all(render_recommendations(results).as_bytes())?;
        }
        OutputFormat::Json => {
            let document = ResultsDocument { results, recommendations: recommendations(results) };
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    info!("Results written to {} ({})", path.display(), format);
    Ok(())
}
