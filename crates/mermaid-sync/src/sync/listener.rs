//! Signal listener
//!
//! Turns lifecycle signals into synchronization passes. It never looks at
//! diagram content and never lets a failed pass escape to the caller, which
//! is usually a DOM event handler.

use tracing::{debug, trace, warn};

use crate::core::{Capability, Document};
use crate::sync::signal::{Signal, SignalQueue};
use crate::sync::synchronizer::Synchronizer;

pub struct SignalListener<D, C> {
    synchronizer: Synchronizer<D, C>,
    ready_seen: bool,
}

impl<D: Document, C: Capability> SignalListener<D, C> {
    pub fn new(synchronizer: Synchronizer<D, C>) -> Self {
        Self {
            synchronizer,
            ready_seen: false,
        }
    }

    /// Document finished loading
    ///
    /// Only the first call triggers a pass.
    pub fn on_ready(&mut self) {
        if self.ready_seen {
            debug!("ignoring repeated ready signal");
            return;
        }
        self.ready_seen = true;
        self.run(Signal::Ready);
    }

    /// Visible content changed; triggers a pass every time
    pub fn on_content_changed(&mut self) {
        self.run(Signal::ContentChanged);
    }

    pub fn dispatch(&mut self, signal: Signal) {
        match signal {
            Signal::Ready => self.on_ready(),
            Signal::ContentChanged => self.on_content_changed(),
        }
    }

    /// Handle every queued signal in arrival order
    ///
    /// Signals pushed while a pass is running are picked up by the same
    /// drain. Returns the number of signals handled.
    pub fn drain(&mut self, queue: &SignalQueue) -> usize {
        let mut handled = 0;
        while let Some(signal) = queue.pop() {
            self.dispatch(signal);
            handled += 1;
        }
        handled
    }

    pub fn has_seen_ready(&self) -> bool {
        self.ready_seen
    }

    pub fn synchronizer(&self) -> &Synchronizer<D, C> {
        &self.synchronizer
    }

    pub fn synchronizer_mut(&mut self) -> &mut Synchronizer<D, C> {
        &mut self.synchronizer
    }

    pub fn into_synchronizer(self) -> Synchronizer<D, C> {
        self.synchronizer
    }

    fn run(&mut self, signal: Signal) {
        match self.synchronizer.synchronize() {
            Ok(report) => trace!(%signal, pass = report.pass, outcome = ?report.outcome, "signal handled"),
            Err(e) => warn!(%signal, error = %e, "synchronization pass failed"),
        }
    }
}
