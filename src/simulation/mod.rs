//! Simulation orchestration and control
//!
//! This module contains the discrete-event engine, the arrival process,
//! bottleneck detection, results collection, and error handling.
//!
//! # Overview
//!
//! The simulation module drives a paint shop shift from time zero to the horizon:
//!
//! - **PaintShopSimulation**: Owns the state and the process table and runs the event loop
//! - **EventScheduler**: Min-heap of pending resumptions with FIFO tie-breaking
//! - **ArrivalProcess**: Admits cars at random intervals until the cutoff
//! - **BottleneckDetector**: Flags queues longer than the configured threshold
//! - **SimulationResults**: Read-only snapshot consumed by reporting
//! - **SimulationError**: Error handling for simulation operations
//!
//! # Usage Example
//!
//! ```rust
//! use paint_shop_simulator::events::MemoryEventLog;
//! use paint_shop_simulator::simulation::*;
//! use paint_shop_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     arrival_cutoff: 60.0,
//!     verbose_logging: false,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let events = MemoryEventLog::new();
//! let simulation = PaintShopSimulation::new(config, Box::new(events.clone())).unwrap();
//! let results = simulation.run().unwrap();
//!
//! assert_eq!(results.cars_in_system, 0);
//! assert_eq!(results.total_cars as u64, results.cars_generated);
//! assert!(!events.is_empty());
//! ```

pub mod arrivals;
pub mod bottleneck;
pub mod clock;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod scheduler;
pub mod statistics;

// Re-export all public types for convenience
pub use arrivals::*;
pub use bottleneck::*;
pub use clock::*;
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use scheduler::*;
pub use statistics::*;
