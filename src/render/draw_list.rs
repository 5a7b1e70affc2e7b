//! Retained display list backend
//!
//! [`DrawList`] keeps the most recent visual for every slot in a [`Scene`]
//! and counts the calls it receives. The counters make redraw behaviour
//! observable (e.g. an unchanged auto axis must not be redrawn), and the
//! scene can be rendered to SVG with [`Scene::to_svg`].

use super::{
    AxisVisual, FacetFrame, LegendVisual, Orientation, PathVisual, RenderBackend, Rect,
    TextVisual,
};
use crate::axis::AxisTicks;
use crate::error::Result;

/// Retained state of one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSnapshot {
    pub ticks: AxisTicks,
    pub plot: Rect,
    pub graph: Rect,
    pub show_labels: bool,
}

/// Retained state of one line, already projected to pixels
///
/// Points without a pixel position (non-finite, or non-positive on a log
/// axis) split the line into separate segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    pub color: String,
    pub segments: Vec<Vec<(f64, f64)>>,
    /// Number of data points, plotted or not
    pub point_count: usize,
}

/// Everything currently drawn
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Facet frames in mount order
    pub facets: Vec<FacetFrame>,
    pub axes: std::collections::BTreeMap<(String, Orientation), AxisSnapshot>,
    pub paths: std::collections::BTreeMap<(String, String), PathSnapshot>,
    pub texts: std::collections::BTreeMap<String, TextVisual>,
    pub legend: Option<LegendVisual>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
            && self.axes.is_empty()
            && self.paths.is_empty()
            && self.texts.is_empty()
            && self.legend.is_none()
    }

    pub fn axis(&self, facet: &str, orientation: Orientation) -> Option<&AxisSnapshot> {
        self.axes.get(&(facet.to_string(), orientation))
    }

    pub fn path(&self, facet: &str, line: &str) -> Option<&PathSnapshot> {
        self.paths.get(&(facet.to_string(), line.to_string()))
    }
}

/// Call counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub clears: u64,
    pub facet_mounts: u64,
    pub axis_updates: u64,
    pub path_updates: u64,
    pub text_updates: u64,
    pub legend_updates: u64,
}

/// Backend that retains the scene in memory
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    scene: Scene,
    stats: RenderStats,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Zero the counters, e.g. to measure a single frame
    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    /// Render the current scene as a standalone SVG document
    pub fn to_svg(&self) -> Result<String> {
        self.scene.to_svg()
    }
}

impl RenderBackend for DrawList {
    fn clear(&mut self) -> Result<()> {
        let (width, height) = (self.scene.width, self.scene.height);
        self.scene = Scene {
            width,
            height,
            ..Scene::default()
        };
        self.stats.clears += 1;
        Ok(())
    }

    fn set_canvas(&mut self, width: f64, height: f64) -> Result<()> {
        self.scene.width = width;
        self.scene.height = height;
        Ok(())
    }

    fn mount_facet(&mut self, frame: &FacetFrame) -> Result<()> {
        self.scene.facets.retain(|f| f.facet != frame.facet);
        self.scene.facets.push(frame.clone());
        self.stats.facet_mounts += 1;
        Ok(())
    }

    fn draw_axis(&mut self, axis: &AxisVisual<'_>) -> Result<()> {
        self.scene.axes.insert(
            (axis.facet.to_string(), axis.orientation),
            AxisSnapshot {
                ticks: axis.ticks.clone(),
                plot: axis.plot,
                graph: axis.graph,
                show_labels: axis.show_labels,
            },
        );
        self.stats.axis_updates += 1;
        Ok(())
    }

    fn draw_path(&mut self, path: &PathVisual<'_>) -> Result<()> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in path.points {
            match path.mapping.project(point.x, point.y) {
                Some(pixel) => current.push(pixel),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        self.scene.paths.insert(
            (path.facet.to_string(), path.line.to_string()),
            PathSnapshot {
                color: path.color.to_string(),
                segments,
                point_count: path.points.len(),
            },
        );
        self.stats.path_updates += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextVisual) -> Result<()> {
        self.scene.texts.insert(text.id.clone(), text.clone());
        self.stats.text_updates += 1;
        Ok(())
    }

    fn draw_legend(&mut self, legend: &LegendVisual) -> Result<()> {
        self.scene.legend = Some(legend.clone());
        self.stats.legend_updates += 1;
        Ok(())
    }
}
