//! Chart controller
//!
//! [`ChartController`] owns the series store, one [`SubPlot`] per facet and
//! the rendering backend. It has two states: unconfigured (no settings yet,
//! redraw requests are refused) and configured. Each `configure` tears down
//! every mounted visual and rebuilds them, bumping a generation counter that
//! invalidates frame callbacks registered against the previous mount.

use super::layout::Layout;
use super::subplot::{AxisState, SubPlot};
use crate::axis::{ScaleKind, X_TICK_POLICY, Y_TICK_POLICY};
use crate::config::{ChartSettings, FALLBACK_COLOR};
use crate::error::{LrCurveError, Result};
use crate::render::{
    AxisVisual, Baseline, LegendEntry, LegendVisual, Orientation, PathVisual, RenderBackend,
    TextAnchor, TextVisual,
};
use crate::store::SeriesStore;
use crate::types::Sample;

/// Offset of the facet label baseline inside its strip
const FACET_LABEL_INSET: f64 = 10.0;

/// Everything built by one `configure` call
#[derive(Debug, Clone)]
struct Mounted {
    settings: ChartSettings,
    layout: Layout,
    x_axis: AxisState,
    subplots: Vec<SubPlot>,
}

/// Drives a [`RenderBackend`] from buffered series data
#[derive(Debug)]
pub struct ChartController<B: RenderBackend> {
    backend: B,
    store: SeriesStore,
    mounted: Option<Mounted>,
    generation: u64,
    pending: bool,
    frames_drawn: u64,
}

fn draw_axis<B: RenderBackend>(
    backend: &mut B,
    subplot: &SubPlot,
    orientation: Orientation,
    axis: &AxisState,
) -> Result<()> {
    let Some(ticks) = axis.ticks() else {
        return Ok(());
    };
    backend.draw_axis(&AxisVisual {
        facet: &subplot.facet,
        orientation,
        ticks,
        plot: subplot.geometry.plot,
        graph: subplot.geometry.graph,
        show_labels: subplot.shows_labels(orientation),
    })
}

impl<B: RenderBackend> ChartController<B> {
    /// Create an unconfigured controller
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            store: SeriesStore::new(),
            mounted: None,
            generation: 0,
            pending: false,
            frames_drawn: 0,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.mounted.is_some()
    }

    /// Settings of the current mount
    pub fn settings(&self) -> Option<&ChartSettings> {
        self.mounted.as_ref().map(|m| &m.settings)
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.mounted.as_ref().map(|m| &m.layout)
    }

    /// Sub-plots in facet order
    pub fn subplots(&self) -> &[SubPlot] {
        self.mounted
            .as_ref()
            .map(|m| m.subplots.as_slice())
            .unwrap_or(&[])
    }

    pub fn subplot(&self, facet: &str) -> Option<&SubPlot> {
        self.subplots().iter().find(|s| s.facet == facet)
    }

    /// Shared x-axis state
    pub fn x_axis(&self) -> Option<&AxisState> {
        self.mounted.as_ref().map(|m| &m.x_axis)
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Token identifying the current mount
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a frame callback is registered and has not run yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of completed redraw passes
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Validate `settings`, then tear down and rebuild every visual.
    ///
    /// Nothing is touched when validation fails. Buffers of (facet, line)
    /// pairs that are still mapped survive. Axes with fixed limits are drawn
    /// immediately; auto axes wait for the next redraw.
    pub fn configure(&mut self, settings: ChartSettings) -> Result<()> {
        settings.validate()?;
        let mounted = Self::build(settings)?;

        let changes = self.store.configure(&mounted.settings.mappings);
        tracing::debug!(
            "Reconfigured series: {} kept, {} added, {} dropped",
            changes.kept.len(),
            changes.added.len(),
            changes.dropped.len()
        );

        self.mounted = None;
        self.generation += 1;
        self.pending = false;

        self.mount(&mounted)?;
        tracing::debug!(
            "Mounted {} facet(s), generation {}",
            mounted.subplots.len(),
            self.generation
        );
        self.mounted = Some(mounted);
        Ok(())
    }

    fn build(settings: ChartSettings) -> Result<Mounted> {
        let facets = settings.facet_order();
        let layout = Layout::compute(&settings.dimensions, facets.len())?;

        for key in settings.facet_config.keys() {
            if !facets.contains(&key.as_str()) {
                tracing::warn!("Facet '{}' has no mapped channel, not rendered", key);
            }
        }

        let mut x_axis = AxisState::new(
            settings.x_axis_config.limit,
            ScaleKind::Linear,
            X_TICK_POLICY,
        );
        if !x_axis.is_dynamic() {
            x_axis.refresh(None)?;
        }

        let last = facets.len() - 1;
        let mut subplots = Vec::with_capacity(facets.len());
        for ((index, facet), geometry) in facets.iter().enumerate().zip(&layout.facets) {
            let config = settings.facet_config.get(*facet).ok_or_else(|| {
                LrCurveError::Config(format!("facet '{}' has no configuration", facet))
            })?;
            let mut y_axis = AxisState::new(config.limit, config.scale, Y_TICK_POLICY);
            if !y_axis.is_dynamic() {
                y_axis.refresh(None)?;
            }
            subplots.push(SubPlot {
                facet: facet.to_string(),
                label: config.name.clone(),
                index,
                geometry: *geometry,
                lines: settings
                    .lines_for_facet(facet)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                y_axis,
                owns_x_axis: index == last,
            });
        }

        Ok(Mounted {
            settings,
            layout,
            x_axis,
            subplots,
        })
    }

    fn mount(&mut self, mounted: &Mounted) -> Result<()> {
        let backend = &mut self.backend;
        backend.clear()?;
        backend.set_canvas(mounted.layout.width, mounted.layout.height)?;

        for subplot in &mounted.subplots {
            backend.mount_facet(&subplot.frame())?;

            let strip = subplot.geometry.strip;
            backend.draw_text(&TextVisual {
                id: format!("facet-label-{}", subplot.index),
                text: subplot.label.clone(),
                baseline: Baseline::vertical((strip.x + FACET_LABEL_INSET, strip.y), strip.height),
                anchor: TextAnchor::Middle,
            })?;

            if !subplot.y_axis.is_dynamic() {
                draw_axis(backend, subplot, Orientation::Vertical, &subplot.y_axis)?;
            }
            if !mounted.x_axis.is_dynamic() {
                draw_axis(backend, subplot, Orientation::Horizontal, &mounted.x_axis)?;
            }
        }

        backend.draw_text(&TextVisual {
            id: "x-label".to_string(),
            text: mounted.settings.x_axis_config.name.clone(),
            baseline: mounted.layout.x_label,
            anchor: TextAnchor::Middle,
        })?;

        let entries = mounted
            .settings
            .line_order()
            .into_iter()
            .filter_map(|key| mounted.settings.line_config.get(key))
            .map(|line| LegendEntry {
                name: line.name.clone(),
                color: line.color.clone(),
            })
            .collect();
        backend.draw_legend(&LegendVisual {
            area: mounted.layout.legend,
            entries,
        })
    }

    /// Buffer one sample. Does not redraw.
    pub fn append(&mut self, sample: &Sample) {
        self.store.append(sample);
    }

    /// Buffer samples in order. Does not redraw.
    pub fn append_all<'a>(&mut self, samples: impl IntoIterator<Item = &'a Sample>) {
        self.store.append_all(samples);
    }

    /// Mark a redraw as pending.
    ///
    /// Returns the generation token the frame callback must present, or
    /// `None` when no callback should be registered: the chart is not
    /// configured or a callback is already pending.
    pub fn begin_redraw(&mut self) -> Option<u64> {
        if self.mounted.is_none() || self.pending {
            return None;
        }
        self.pending = true;
        Some(self.generation)
    }

    /// Frame callback body; returns whether a redraw happened.
    ///
    /// A callback registered before the latest `configure` is stale and does
    /// nothing.
    pub fn on_frame(&mut self, generation: u64) -> Result<bool> {
        if generation != self.generation {
            tracing::trace!(
                "Ignoring stale frame callback (generation {}, current {})",
                generation,
                self.generation
            );
            return Ok(false);
        }
        if !self.pending {
            return Ok(false);
        }
        self.pending = false;
        self.redraw()?;
        Ok(true)
    }

    /// Redraw immediately
    ///
    /// A frame callback that is already registered stays armed, so the
    /// pending flag is left alone and no second callback can be registered
    /// before it runs.
    pub fn redraw_now(&mut self) -> Result<()> {
        self.redraw()
    }

    /// One redraw pass: refresh auto axes, then push every line and the
    /// axes whose domain changed to the backend.
    ///
    /// A failed pass forgets the resolved auto domains, so the next pass
    /// redraws those axes even when the data did not change.
    pub fn redraw(&mut self) -> Result<()> {
        let result = self.redraw_pass();
        if result.is_err() {
            if let Some(mounted) = self.mounted.as_mut() {
                if mounted.x_axis.is_dynamic() {
                    mounted.x_axis.invalidate();
                }
                for subplot in &mut mounted.subplots {
                    if subplot.y_axis.is_dynamic() {
                        subplot.y_axis.invalidate();
                    }
                }
            }
        }
        result
    }

    fn redraw_pass(&mut self) -> Result<()> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        let store = &self.store;
        let backend = &mut self.backend;

        let x_changed = if mounted.x_axis.is_dynamic() {
            mounted.x_axis.refresh(store.x_extent())?
        } else {
            false
        };

        for subplot in &mut mounted.subplots {
            let y_changed = if subplot.y_axis.is_dynamic() {
                let observed = store.y_extent(&subplot.facet, subplot.y_axis.positive_only());
                subplot.y_axis.refresh(observed)?
            } else {
                false
            };

            if let Some(mapping) = subplot.pixel_mapping(&mounted.x_axis)? {
                for line in &subplot.lines {
                    let Some(buffer) = store.buffer(&subplot.facet, line) else {
                        continue;
                    };
                    let color = mounted
                        .settings
                        .line_config
                        .get(line)
                        .map_or(FALLBACK_COLOR, |l| l.color.as_str());
                    backend.draw_path(&PathVisual {
                        facet: &subplot.facet,
                        line,
                        color,
                        points: buffer.points(),
                        mapping: &mapping,
                    })?;
                }
            }

            if y_changed {
                draw_axis(backend, subplot, Orientation::Vertical, &subplot.y_axis)?;
            }
            if x_changed {
                draw_axis(backend, subplot, Orientation::Horizontal, &mounted.x_axis)?;
            }
        }

        self.frames_drawn += 1;
        tracing::trace!(
            "Frame {} drawn ({} points buffered)",
            self.frames_drawn,
            store.total_points()
        );
        Ok(())
    }
}
