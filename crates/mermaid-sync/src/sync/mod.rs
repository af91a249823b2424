//! Synchronization pipeline
//!
//! Signal → [`SignalListener`] → [`Synchronizer`] → engine. Within a pass:
//! [`select_sources`] → [`plan_conversions`] → apply → render.

pub mod listener;
pub mod plan;
pub mod select;
pub mod signal;
pub mod synchronizer;

pub use listener::*;
pub use plan::*;
pub use select::*;
pub use signal::*;
pub use synchronizer::*;
