//! Lifecycle signals
//!
//! Whoever knows that the page changed (a DOM event handler, a router hook,
//! a test) pushes a [`Signal`] through a [`Notifier`]. The listener drains
//! the shared [`SignalQueue`] in arrival order. Signals carry no payload.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::core::READY_EVENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The document finished loading; fires once
    Ready,
    /// Visible content was replaced or extended
    ContentChanged,
}

impl Signal {
    /// Map a DOM event name onto a signal
    pub fn from_event(name: &str, change_event: &str) -> Option<Self> {
        if name == READY_EVENT {
            Some(Signal::Ready)
        } else if name == change_event {
            Some(Signal::ContentChanged)
        } else {
            None
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Ready => f.write_str("ready"),
            Signal::ContentChanged => f.write_str("content-changed"),
        }
    }
}

/// FIFO of pending signals, shared with any number of notifiers
#[derive(Debug, Clone, Default)]
pub struct SignalQueue {
    pending: Rc<RefCell<VecDeque<Signal>>>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cloneable handle that can only push
    pub fn notifier(&self) -> Notifier {
        Notifier {
            pending: Rc::clone(&self.pending),
        }
    }

    pub fn push(&self, signal: Signal) {
        self.pending.borrow_mut().push_back(signal);
    }

    pub fn pop(&self) -> Option<Signal> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Fire-and-forget sender half of a [`SignalQueue`]
#[derive(Debug, Clone)]
pub struct Notifier {
    pending: Rc<RefCell<VecDeque<Signal>>>,
}

impl Notifier {
    pub fn notify(&self, signal: Signal) {
        self.pending.borrow_mut().push_back(signal);
    }

    pub fn ready(&self) {
        self.notify(Signal::Ready);
    }

    pub fn content_changed(&self) {
        self.notify(Signal::ContentChanged);
    }
}
