//! Core error types for diagram synchronization
//!
//! A missing engine is not an error (see [`PassOutcome`](crate::sync::PassOutcome)).
//! Everything here is either a configuration problem, a DOM conflict, or a
//! failure reported by the external engine.

use thiserror::Error;

/// Failures raised by a [`Document`](crate::core::Document) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node was removed from the tree before it could be replaced
    #[error("Node is no longer attached to the document")]
    Detached,

    #[error("Query error: {message}")]
    Query { message: String },

    #[error("Mutation error: {message}")]
    Mutation { message: String },
}

impl DomError {
    /// Create a new query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a new mutation error
    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation {
            message: message.into(),
        }
    }
}

/// Errors surfaced by a synchronization pass or by configuration loading
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Engine initialization failed: {source}")]
    EngineInitialize { source: anyhow::Error },

    #[error("Engine render failed: {source}")]
    EngineRender { source: anyhow::Error },
}

impl SyncError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn engine_initialize(source: anyhow::Error) -> Self {
        Self::EngineInitialize { source }
    }

    pub fn engine_render(source: anyhow::Error) -> Self {
        Self::EngineRender { source }
    }
}
