//! Frame scheduling
//!
//! The chart never redraws synchronously on `append`; it asks the host to run
//! a callback before the next repaint. [`FrameScheduler`] is that capability.
//! Hosts with a real display loop implement it on top of their
//! request-animation-frame primitive; [`ManualScheduler`] and
//! [`ImmediateScheduler`] cover tests, benchmarks and headless rendering.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Callback run once on the next frame
pub type FrameCallback = Box<dyn FnOnce()>;

/// Host capability: run `callback` once before the next repaint
///
/// Implementations must not invoke a registered callback more than once.
pub trait FrameScheduler {
    fn schedule_once(&self, callback: FrameCallback);
}

/// Queues callbacks until [`run_frame`](ManualScheduler::run_frame) is called
///
/// Callbacks registered while a frame runs are deferred to the next frame.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every callback queued before this call; returns how many ran
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let count = batch.len();
        for callback in batch {
            callback();
        }
        if count > 0 {
            tracing::trace!("Ran {} frame callback(s)", count);
        }
        count
    }

    /// Run frames until the queue is empty or `max_frames` frames ran
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending() > 0 {
            self.run_frame();
            frames += 1;
        }
        frames
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_once(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Runs callbacks inline, turning every redraw request into a synchronous
/// redraw
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn schedule_once(&self, callback: FrameCallback) {
        callback();
    }
}
