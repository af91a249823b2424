//! The render synchronizer
//!
//! One pass runs select → plan → apply → render. Passes take `&mut self`, so
//! they can never overlap; a later pass always sees the markers created by
//! earlier ones and leaves them alone.

use tracing::{debug, info, info_span, warn};

use crate::core::{Capability, Document, DomError, RenderConfig, SyncConfig, SyncError};
use crate::sync::plan::plan_conversions;
use crate::sync::select::select_sources;

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No engine was available; the document was not touched
    EngineUnavailable,
    /// Sources were converted and the engine was asked to render
    Rendered,
    /// Sources were converted but the engine refused to render
    RenderFailed,
}

/// What a single pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based pass number
    pub pass: u64,
    pub outcome: PassOutcome,
    /// Whether this pass (re)initialized the engine
    pub initialized: bool,
    /// Sources seen, converted or not
    pub found: usize,
    pub converted: usize,
    pub already_converted: usize,
    pub deferred: usize,
    /// Sources removed from the document before they could be replaced
    pub vanished: usize,
    pub failed: usize,
}

impl PassReport {
    fn unavailable(pass: u64) -> Self {
        Self {
            pass,
            outcome: PassOutcome::EngineUnavailable,
            initialized: false,
            found: 0,
            converted: 0,
            already_converted: 0,
            deferred: 0,
            vanished: 0,
            failed: 0,
        }
    }

    pub fn rendered(&self) -> bool {
        self.outcome == PassOutcome::Rendered
    }
}

/// Converts diagram sources into markers and drives the engine
///
/// The document and the engine capability are injected; in tests they are a
/// [`MemoryDocument`](crate::memory::MemoryDocument) and an
/// `Option<RecordingEngine>`.
pub struct Synchronizer<D, C> {
    document: D,
    capability: C,
    config: SyncConfig,
    initialized: bool,
    passes: u64,
    last_report: Option<PassReport>,
}

impl<D: Document, C: Capability> Synchronizer<D, C> {
    pub fn new(document: D, capability: C, config: SyncConfig) -> Self {
        Self {
            document,
            capability,
            config,
            initialized: false,
            passes: 0,
            last_report: None,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    pub fn capability_mut(&mut self) -> &mut C {
        &mut self.capability
    }

    /// Number of passes started so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    /// Whether the current engine has received the current configuration
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Swap in a new engine configuration
    ///
    /// The next pass that finds an engine initializes it with `render` as a
    /// whole; nothing of the previous configuration is carried over.
    pub fn reconfigure(&mut self, render: RenderConfig) {
        info!(theme = %render.theme, "engine configuration replaced");
        self.config.render = render;
        self.initialized = false;
    }

    /// Run one synchronization pass
    ///
    /// A missing engine is not an error: the pass reports
    /// [`PassOutcome::EngineUnavailable`] and leaves the document untouched.
    /// Sources that disappear mid-pass are skipped without aborting the pass.
    pub fn synchronize(&mut self) -> Result<PassReport, SyncError> {
        self.passes += 1;
        let pass = self.passes;

        let span = info_span!("synchronize", pass);
        let _enter = span.enter();

        let Self {
            document,
            capability,
            config,
            initialized,
            last_report,
            ..
        } = self;

        let Some(engine) = capability.engine() else {
            if *initialized {
                debug!("engine disappeared, it will be initialized again when it returns");
            }
            *initialized = false;
            debug!("engine unavailable, skipping pass");
            let report = PassReport::unavailable(pass);
            *last_report = Some(report.clone());
            return Ok(report);
        };

        let initialized_now = !*initialized;
        if initialized_now {
            engine
                .initialize(&config.render)
                .map_err(SyncError::engine_initialize)?;
            *initialized = true;
            info!(
                engine = engine.name(),
                theme = %config.render.theme,
                start_on_load = config.render.start_on_load,
                "engine initialized"
            );
        }

        let sources = select_sources(&*document, config)?;
        let plan = plan_conversions(&sources, config);

        let mut report = PassReport {
            pass,
            outcome: PassOutcome::Rendered,
            initialized: initialized_now,
            found: sources.len() - plan.duplicates,
            converted: 0,
            already_converted: plan.already_converted,
            deferred: plan.deferred,
            vanished: 0,
            failed: 0,
        };

        for conversion in &plan.conversions {
            match document.replace_with_marker(&conversion.target, &conversion.marker) {
                Ok(_) => {
                    report.converted += 1;
                    debug!(
                        shape = %conversion.marker.origin,
                        text_len = conversion.marker.text.len(),
                        "converted diagram source"
                    );
                }
                Err(DomError::Detached) => {
                    report.vanished += 1;
                    debug!(node = ?conversion.target, "source detached before conversion");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(node = ?conversion.target, error = %e, "failed to convert diagram source");
                }
            }
        }

        let selector = config.marker_selector();
        if let Err(e) = engine.render(&selector) {
            report.outcome = PassOutcome::RenderFailed;
            *last_report = Some(report);
            return Err(SyncError::engine_render(e));
        }

        info!(
            found = report.found,
            converted = report.converted,
            already_converted = report.already_converted,
            deferred = report.deferred,
            vanished = report.vanished,
            selector = %selector,
            "synchronization pass complete"
        );

        *last_report = Some(report.clone());
        Ok(report)
    }

    pub fn into_parts(self) -> (D, C) {
        (self.document, self.capability)
    }
}
