//! Capture scheduling: at most one rasterization pass in flight per lens.
//!
//! Rasterization walks a mutable DOM clone, so two concurrent passes against
//! the same page can disagree with each other. Requests that arrive while a
//! pass is running are coalesced into a single follow-up pass.

use std::cell::Cell;

/// Single-flight gate for capture passes.
#[derive(Debug, Default)]
pub struct CaptureGate {
    busy: Cell<bool>,
    queued: Cell<bool>,
    requested: Cell<u32>,
}

impl CaptureGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capture request. Returns `true` when the caller should
    /// start a pass now; `false` means one is already running and the
    /// request was queued behind it.
    pub fn request(&self) -> bool {
        self.requested.set(self.requested.get() + 1);
        if self.busy.get() {
            self.queued.set(true);
            false
        } else {
            self.busy.set(true);
            true
        }
    }

    /// A pass finished. Returns `true` when a queued request should run
    /// immediately (the gate stays held); `false` releases the gate.
    pub fn settle(&self) -> bool {
        if self.queued.replace(false) {
            true
        } else {
            self.busy.set(false);
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.busy.get()
    }

    /// Total requests seen, including coalesced ones.
    pub fn requested(&self) -> u32 {
        self.requested.get()
    }
}
