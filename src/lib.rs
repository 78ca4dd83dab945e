//! Paint Shop Simulator
//!
//! A discrete-event simulation of a three-stage automotive paint shop conveyor:
//! cleaning, primer application, and painting, each with a fixed number of
//! parallel machines and random service times.
//!
//! # Overview
//!
//! Cars arrive at random intervals during a shift, queue in FIFO order for a
//! machine at each station, and leave once painted. The simulation reports
//! throughput, per-station utilization, wait times and bottleneck alerts.
//!
//! ## Key Features
//!
//! - **Deterministic Event Loop**: Min-heap scheduler with FIFO tie-breaking over simulated minutes
//! - **Capacity-Limited Stations**: Machine slots are tokens that must be released to be reused
//! - **Bottleneck Detection**: Every queue over the threshold raises an alert
//! - **Event Log**: Every event persisted to file, console echo filtered by detail level
//! - **Reproducible Runs**: Optional seed for the random number generator
//! - **Configurable Simulation**: Defaults, JSON config file and CLI flags
//!
//! ## Quick Start
//!
//! ```rust
//! use paint_shop_simulator::*;
//!
//! let config = SimulationConfig {
//!     arrival_cutoff: 120.0,
//!     verbose_logging: false,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let events = MemoryEventLog::new();
//! let results = PaintShopSimulation::new(config, Box::new(events.clone()))?.run()?;
//!
//! println!("{}", results.summary());
//! println!("{}", report::render_recommendations(&results));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Core types, identifiers, and configuration
//! - [`station`]: Station resources and per-station metrics
//! - [`car`]: Car records and the journey process
//! - [`events`]: Shop event records and log sinks
//! - [`simulation`]: Event loop, arrivals, bottleneck detection and results
//! - [`report`]: Results summary, recommendations and results file
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Station   │    │     Car     │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Resource    │◄───┤ Timestamps  │
//! │ Enums       │    │ Metrics     │    │ Journey     │
//! │ Config      │    │             │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Events    │    │ Simulation  │    │   Report    │
//! │             │    │             │    │             │
//! │ ShopEvent   │◄───┤ Scheduler   │◄───┤ Summary     │
//! │ Sinks       │    │ Orchestrator│    │ Advice      │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod car;
pub mod events;
pub mod report;
pub mod simulation;
pub mod station;

pub mod types;

// Core types and identifiers
pub use types::{
    CarId,
    CliArgs,
    ConfigError,
    ConfigValidationError,
    LogDetailLevel,
    OutputFormat,
    ProcessId,
    RunId,
    // Configuration
    SimulationConfig,
    StationConfig,
    // Enums
    StationKind,
    TimeRange,
};

// Stations and cars
pub use car::{Car, CarJourney, JourneyState};
pub use station::{MachineSlot, StationMetrics, StationResource};

// Event log
pub use events::{EventLog, EventSink, FileEventLog, MemoryEventLog, ShopEvent, ShopEventKind};

// Simulation types and functionality
pub use simulation::{
    BottleneckDetector, LoggingConfig, PaintShopSimulation, SimTime, SimulationError,
    SimulationResult, SimulationResults,
};
