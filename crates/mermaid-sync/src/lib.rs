//! mermaid-sync - keep Mermaid.js diagrams rendered across client-side navigation
//!
//! Documentation sites ship diagram definitions as fenced code blocks
//! (`<pre><code class="language-mermaid">`) or class-marked elements
//! (`<div class="mermaid">`). This crate turns those into the marker elements
//! the engine draws into, exactly once per source, and asks the engine to
//! render again whenever the page signals that its content changed.
//!
//! # Quick Start
//!
//! In the browser, build with `wasm-pack` and call `install()` from the page
//! (see the `wasm` module). Outside a browser, drive a [`Synchronizer`]
//! against the in-memory document:
//!
//! ```rust
//! use mermaid_sync::memory::{MemoryDocument, RecordingEngine};
//! use mermaid_sync::prelude::*;
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");
//!
//! let sync = Synchronizer::new(doc, Some(RecordingEngine::new()), SyncConfig::default());
//! let mut listener = SignalListener::new(sync);
//! listener.on_ready();
//! listener.on_content_changed();
//!
//! let sync = listener.synchronizer();
//! assert_eq!(sync.passes(), 2);
//! assert_eq!(sync.document().elements_with_class("mermaid").len(), 1);
//! ```

pub mod core;
pub mod memory;
pub mod sync;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use crate::sync::{PassOutcome, PassReport, Signal, SignalListener, Synchronizer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Capability, DiagramMarker, DiagramSource, Document, Engine, MarkerSelector,
        RenderConfig, SecurityLevel, SourceShape, SyncConfig, SyncError,
    };
    pub use crate::sync::{
        Notifier, PassOutcome, PassReport, Signal, SignalListener, SignalQueue, Synchronizer,
    };
}
