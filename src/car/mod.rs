//! Cars and their journeys
//!
//! [`Car`] is the passive timestamp record; [`CarJourney`] is the process that
//! moves it through the stations.

pub mod car;
pub mod journey;

pub use car::*;
pub use journey::*;
