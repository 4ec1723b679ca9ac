//! Container width observation decoupled from any UI runtime.
//!
//! Hosts push widths through a [`ResizeSender`] from wherever their resize
//! callbacks fire; the owning chart drains them with
//! [`ResizeCoordinator::poll`] on its own event loop turn.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, trace, warn};

/// Cloneable handle used by the host to report container widths.
#[derive(Debug, Clone)]
pub struct ResizeSender {
    tx: Sender<f64>,
}

impl ResizeSender {
    /// Queues a width sample. Returns `false` once the coordinator is gone.
    pub fn notify(&self, width: f64) -> bool {
        self.tx.send(width).is_ok()
    }
}

/// Collapses queued width samples into at most one relayout per poll.
///
/// Later samples supersede earlier ones, and widths that differ from the
/// current one by less than `min_delta_px` are ignored.
#[derive(Debug)]
pub struct ResizeCoordinator {
    current_width: u32,
    min_delta_px: f64,
    tx: Sender<f64>,
    rx: Receiver<f64>,
}

impl ResizeCoordinator {
    #[must_use]
    pub fn new(initial_width: u32, min_delta_px: f64) -> Self {
        let (tx, rx) = mpsc::channel();
        let min_delta_px = if min_delta_px.is_finite() {
            min_delta_px.max(0.0)
        } else {
            0.0
        };
        Self {
            current_width: initial_width,
            min_delta_px,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn sender(&self) -> ResizeSender {
        ResizeSender {
            tx: self.tx.clone(),
        }
    }

    /// Queues a width sample from the owning thread.
    pub fn notify(&self, width: f64) {
        // The receiver lives in `self`, so the send cannot fail here.
        let _ = self.tx.send(width);
    }

    #[must_use]
    pub fn current_width(&self) -> u32 {
        self.current_width
    }

    #[must_use]
    pub fn min_delta_px(&self) -> f64 {
        self.min_delta_px
    }

    /// Drains pending samples and returns the new width when a relayout is due.
    pub fn poll(&mut self) -> Option<u32> {
        let mut latest = None;
        let mut received = 0usize;
        for width in self.rx.try_iter() {
            received += 1;
            if width.is_finite() && width >= 0.0 {
                latest = Some(width);
            } else {
                warn!(width, "ignoring invalid container width");
            }
        }

        let width = latest?;
        if (width - f64::from(self.current_width)).abs() < self.min_delta_px {
            trace!(
                width,
                current_width = self.current_width,
                "ignoring insignificant resize"
            );
            return None;
        }

        let rounded = round_width(width);
        if rounded == self.current_width {
            return None;
        }

        debug!(
            previous_width = self.current_width,
            width = rounded,
            coalesced = received,
            "container resized"
        );
        self.current_width = rounded;
        Some(rounded)
    }
}

fn round_width(width: f64) -> u32 {
    let rounded = width.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        // Finite, non-negative and below `u32::MAX` after the checks above.
        rounded as u32
    }
}
