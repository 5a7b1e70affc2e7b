//! Live learning-curve chart
//!
//! [`LearningCurve`] is the handle callers keep: it owns a
//! [`ChartController`] and the injected [`FrameScheduler`], and turns every
//! `append` into at most one redraw per frame.
//!
//! ```ignore
//! use lrcurve_rs::{ChartSettings, DrawList, LearningCurve, ManualScheduler, Sample};
//! use std::rc::Rc;
//!
//! let frames = Rc::new(ManualScheduler::new());
//! let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), ChartSettings::default())?;
//!
//! for epoch in 0..10 {
//!     chart.append(Sample::new(epoch as f64).with("loss", 1.0 / (epoch + 1) as f64));
//! }
//! frames.run_frame(); // one redraw for all ten samples
//! ```

pub mod controller;
pub mod layout;
pub mod subplot;

pub use controller::ChartController;
pub use layout::{FacetGeometry, Insets, Layout};
pub use subplot::{AxisState, SubPlot};

use crate::config::ChartSettings;
use crate::error::{LrCurveError, Result, ResultExt};
use crate::render::RenderBackend;
use crate::scheduler::FrameScheduler;
use crate::types::Sample;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Handle to a live chart
///
/// All methods take `&self`; the chart lives on one thread and frame
/// callbacks only hold a weak reference to it, so dropping the handle turns
/// pending callbacks into no-ops.
pub struct LearningCurve<B: RenderBackend + 'static> {
    controller: Rc<RefCell<ChartController<B>>>,
    scheduler: Rc<dyn FrameScheduler>,
    frame_error: Rc<RefCell<Option<LrCurveError>>>,
}

impl<B: RenderBackend + 'static> LearningCurve<B> {
    /// Create an unconfigured chart
    pub fn new(backend: B, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            controller: Rc::new(RefCell::new(ChartController::new(backend))),
            scheduler,
            frame_error: Rc::new(RefCell::new(None)),
        }
    }

    /// Create and configure a chart
    pub fn with_settings(
        backend: B,
        scheduler: Rc<dyn FrameScheduler>,
        settings: ChartSettings,
    ) -> Result<Self> {
        let chart = Self::new(backend, scheduler);
        chart.configure(settings)?;
        Ok(chart)
    }

    /// Replace the settings, then schedule a redraw so preserved data
    /// reappears.
    pub fn configure(&self, settings: ChartSettings) -> Result<()> {
        self.controller
            .borrow_mut()
            .configure(settings)
            .context("Failed to configure chart")?;
        self.request_redraw();
        Ok(())
    }

    /// Buffer a sample and schedule a redraw
    pub fn append(&self, sample: Sample) {
        self.controller.borrow_mut().append(&sample);
        self.request_redraw();
    }

    /// Buffer samples in order and schedule a single redraw
    pub fn append_all(&self, samples: impl IntoIterator<Item = Sample>) {
        {
            let mut controller = self.controller.borrow_mut();
            for sample in samples {
                controller.append(&sample);
            }
        }
        self.request_redraw();
    }

    /// Buffer rows given as JSON (`[[x, {channel: value}], ...]`)
    pub fn append_json(&self, rows: &str) -> Result<()> {
        let samples = Sample::rows_from_json(rows)
            .map_err(|e| LrCurveError::Serialization(format!("Failed to parse rows: {}", e)))?;
        self.append_all(samples);
        Ok(())
    }

    /// Register a frame callback unless one is already pending
    pub fn request_redraw(&self) {
        // The controller borrow must end before scheduling: an inline
        // scheduler runs the callback right away.
        let Some(generation) = self.controller.borrow_mut().begin_redraw() else {
            return;
        };

        let controller = Rc::downgrade(&self.controller);
        let frame_error = Rc::clone(&self.frame_error);
        self.scheduler.schedule_once(Box::new(move || {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            let result = controller.borrow_mut().on_frame(generation);
            if let Err(e) = result {
                tracing::error!("Frame redraw failed: {}", e);
                *frame_error.borrow_mut() = Some(e);
            }
        }));
    }

    /// Redraw synchronously; a registered frame callback still runs.
    pub fn redraw_now(&self) -> Result<()> {
        self.controller.borrow_mut().redraw_now()
    }

    /// Error raised by the most recent failed frame callback, if any
    pub fn take_frame_error(&self) -> Option<LrCurveError> {
        self.frame_error.borrow_mut().take()
    }

    pub fn controller(&self) -> Ref<'_, ChartController<B>> {
        self.controller.borrow()
    }

    pub fn backend(&self) -> Ref<'_, B> {
        Ref::map(self.controller.borrow(), |c| c.backend())
    }

    pub fn backend_mut(&self) -> RefMut<'_, B> {
        RefMut::map(self.controller.borrow_mut(), |c| c.backend_mut())
    }
}

impl<B: RenderBackend + std::fmt::Debug + 'static> std::fmt::Debug for LearningCurve<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningCurve")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
