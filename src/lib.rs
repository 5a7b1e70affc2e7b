//! # lrcurve-rs: live learning-curve charts
//!
//! A chart engine for training metrics that arrive one epoch (or one batch)
//! at a time. Metrics are routed to facets (stacked sub-plots sharing one
//! x-axis) and lines within a facet; every facet gets an auto-scaling or
//! fixed y-axis on a linear or log10 scale.
//!
//! ## Architecture
//!
//! - **Store**: append-only series buffers keyed by (facet, line)
//! - **Axis**: domain resolution, d3-style nice ticks and minor grid lines
//! - **Chart**: the controller that mounts facets and redraws at most once
//!   per frame, plus the [`LearningCurve`] handle
//! - **Render**: the drawing backend trait, a retained [`DrawList`] and an SVG
//!   snapshot of it drawn with plotters
//! - **Scheduler**: the host's "run once before the next repaint" capability
//!
//! ## Example
//!
//! ```ignore
//! use lrcurve_rs::{ChartSettings, DrawList, LearningCurve, ManualScheduler, Sample};
//! use std::rc::Rc;
//!
//! let frames = Rc::new(ManualScheduler::new());
//! let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), ChartSettings::default())?;
//!
//! chart.append(Sample::new(0.0).with("loss", 0.9).with("val_loss", 1.1));
//! chart.append(Sample::new(1.0).with("loss", 0.6).with("val_loss", 0.8));
//! frames.run_frame();
//!
//! std::fs::write("curve.svg", chart.backend().to_svg()?)?;
//! ```

pub mod axis;
pub mod chart;
pub mod config;
pub mod error;
pub mod recorder;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use axis::{AxisLimit, ScaleKind};
pub use chart::{ChartController, LearningCurve};
pub use config::{infer_settings, ChannelTarget, ChartSettings, Dimensions, FacetConfig, InferOverrides, LineConfig};
pub use error::{LrCurveError, Result};
pub use recorder::EpochRecorder;
pub use render::{DrawList, RenderBackend, Scene};
pub use scheduler::{FrameScheduler, ImmediateScheduler, ManualScheduler};
pub use store::SeriesStore;
pub use types::{DataPoint, Sample, SeriesBuffer};
