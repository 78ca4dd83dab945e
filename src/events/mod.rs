//! Shop floor event stream
//!
//! This module contains the event record emitted by the simulation core and the
//! sinks that persist it.

pub mod shop_event;
pub mod sink;

pub use shop_event::*;
pub use sink::*;
