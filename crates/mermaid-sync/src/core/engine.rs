//! Rendering engine capability
//!
//! The engine draws diagrams into marker elements. It is supplied from outside
//! and may show up late (a deferred script), so the synchronizer asks a
//! [`Capability`] for it at the start of every pass instead of holding it.

use anyhow::Result;

use crate::core::{MarkerSelector, RenderConfig};

/// Core trait for diagram rendering engines
pub trait Engine {
    /// Apply a configuration, replacing whatever the engine had before
    fn initialize(&mut self, config: &RenderConfig) -> Result<()>;

    /// Draw every element matched by `selector`
    ///
    /// Engines are expected to skip markers they already drew.
    fn render(&mut self, selector: &MarkerSelector) -> Result<()>;

    fn name(&self) -> &'static str {
        "engine"
    }
}

/// Something that may or may not currently provide an engine
pub trait Capability {
    fn engine(&mut self) -> Option<&mut dyn Engine>;
}

impl<E: Engine> Capability for Option<E> {
    fn engine(&mut self) -> Option<&mut dyn Engine> {
        self.as_mut().map(|engine| engine as &mut dyn Engine)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn initialize(&mut self, config: &RenderConfig) -> Result<()> {
        (**self).initialize(config)
    }

    fn render(&mut self, selector: &MarkerSelector) -> Result<()> {
        (**self).render(selector)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
