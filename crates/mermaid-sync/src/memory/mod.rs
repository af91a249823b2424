//! In-memory document and engine
//!
//! Lets the synchronizer run without a browser: in this crate's tests, and in
//! downstream crates that want to check their own wiring.
//!
//! ```rust
//! use mermaid_sync::memory::{MemoryDocument, RecordingEngine};
//! use mermaid_sync::{SyncConfig, Synchronizer};
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");
//!
//! let mut sync = Synchronizer::new(doc, Some(RecordingEngine::new()), SyncConfig::default());
//! let report = sync.synchronize().unwrap();
//! assert_eq!(report.converted, 1);
//! assert_eq!(sync.document().elements_with_class("mermaid").len(), 1);
//! ```

mod document;
mod engine;

pub use document::*;
pub use engine::*;
