//! Core types and identifiers for the paint shop simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! The types module provides the foundational data types for the simulation:
//!
//! - **Identifiers**: sequential car ids, process handles and per-run UUIDs
//! - **Enums**: the conveyor stations, log detail levels and output formats
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use paint_shop_simulator::types::*;
//!
//! let first = CarId::FIRST;
//! assert_eq!(first.next(), CarId(2));
//!
//! assert_eq!(StationKind::Cleaning.next(), Some(StationKind::Primer));
//!
//! let config = SimulationConfig {
//!     arrival_cutoff: 120.0,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
