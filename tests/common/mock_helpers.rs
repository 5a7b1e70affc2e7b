//! Mock construction helpers

use lrcurve_rs::error::{LrCurveError, Result};
use lrcurve_rs::render::{
    AxisVisual, FacetFrame, LegendVisual, PathVisual, RenderBackend, TextVisual,
};
use lrcurve_rs::scheduler::{FrameCallback, FrameScheduler};
use lrcurve_rs::DrawList;
use mockall::mock;

mock! {
    pub Scheduler {}

    impl FrameScheduler for Scheduler {
        fn schedule_once(&self, callback: FrameCallback);
    }
}

/// Backend that records into a DrawList and fails path draws once armed
#[derive(Debug, Default)]
pub struct FailingBackend {
    pub inner: DrawList,
    pub fail_paths: bool,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for FailingBackend {
    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }

    fn set_canvas(&mut self, width: f64, height: f64) -> Result<()> {
        self.inner.set_canvas(width, height)
    }

    fn mount_facet(&mut self, frame: &FacetFrame) -> Result<()> {
        self.inner.mount_facet(frame)
    }

    fn draw_axis(&mut self, axis: &AxisVisual<'_>) -> Result<()> {
        self.inner.draw_axis(axis)
    }

    fn draw_path(&mut self, path: &PathVisual<'_>) -> Result<()> {
        if self.fail_paths {
            return Err(LrCurveError::Render(format!(
                "cannot draw {}/{}",
                path.facet, path.line
            )));
        }
        self.inner.draw_path(path)
    }

    fn draw_text(&mut self, text: &TextVisual) -> Result<()> {
        self.inner.draw_text(text)
    }

    fn draw_legend(&mut self, legend: &LegendVisual) -> Result<()> {
        self.inner.draw_legend(legend)
    }
}
