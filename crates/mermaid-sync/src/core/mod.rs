//! Core abstractions for diagram synchronization
//!
//! The traits here are the seams of the crate: [`Document`] for the page,
//! [`Engine`] and [`Capability`] for the external renderer.

mod config;
mod document;
mod engine;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use logging::*;
pub use types::*;
