//! Load state machine
//!
//! `Idle -> Loading -> Idle`, with no other transitions. A trigger arriving
//! while `Loading` loses the compare-exchange and is dropped, not queued,
//! which is what keeps rapid repeated scroll events from stacking requests.

use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

const IDLE: u8 = 0;
const LOADING: u8 = 1;

/// Observable load state of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch in flight; triggers are accepted.
    Idle,
    /// A fetch is in flight; further triggers are dropped.
    Loading,
}

/// Atomic gate serializing fetch triggers.
#[derive(Debug)]
pub(crate) struct LoadGate(AtomicU8);

impl LoadGate {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    /// Attempts the `Idle -> Loading` transition.
    ///
    /// Returns `false` if the gate was already `Loading`; the caller must
    /// then drop the trigger.
    pub(crate) fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(IDLE, LOADING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Transitions back to `Idle`. Called when the fetch settles, success or
    /// failure, so an error never wedges the view.
    pub(crate) fn release(&self) {
        self.0.store(IDLE, Ordering::SeqCst);
    }

    pub(crate) fn state(&self) -> LoadState {
        match self.0.load(Ordering::SeqCst) {
            IDLE => LoadState::Idle,
            _ => LoadState::Loading,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.state() == LoadState::Loading
    }
}
