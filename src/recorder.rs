//! Epoch-driven recording
//!
//! [`EpochRecorder`] sits between a training loop and a [`LearningCurve`]:
//! it turns per-epoch metric logs into samples, batches them by
//! `draw_interval`, and (unless the caller pinned the mapping) grows the
//! chart as new metrics show up.

use crate::chart::LearningCurve;
use crate::config::{infer_settings, InferOverrides};
use crate::error::{LrCurveError, Result, ResultExt};
use crate::render::RenderBackend;
use crate::types::Sample;
use std::collections::{BTreeMap, BTreeSet};

/// Feeds epoch logs to a chart
pub struct EpochRecorder<B: RenderBackend + 'static> {
    curve: LearningCurve<B>,
    overrides: InferOverrides,
    epochs: Option<u64>,
    draw_interval: u64,
    dynamic: bool,
    known_metrics: BTreeSet<String>,
    backlog: Vec<Sample>,
}

impl<B: RenderBackend + 'static> EpochRecorder<B> {
    /// Wrap `curve`.
    ///
    /// With mappings in `overrides` the chart is configured once, here.
    /// Otherwise it stays unconfigured until the first epoch reports metrics.
    pub fn new(
        curve: LearningCurve<B>,
        draw_interval: u64,
        overrides: InferOverrides,
        epochs: Option<u64>,
    ) -> Result<Self> {
        if draw_interval == 0 {
            return Err(LrCurveError::Config(
                "draw interval must be positive".to_string(),
            ));
        }

        let dynamic = !overrides.has_mappings();
        if !dynamic {
            let settings = infer_settings(std::iter::empty(), &overrides, epochs);
            curve
                .configure(settings)
                .context("Failed to configure recorder chart")?;
        }

        Ok(Self {
            curve,
            overrides,
            epochs,
            draw_interval,
            dynamic,
            known_metrics: BTreeSet::new(),
            backlog: Vec::new(),
        })
    }

    /// Whether the mapping is re-inferred as metrics appear
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn known_metrics(&self) -> &BTreeSet<String> {
        &self.known_metrics
    }

    /// Samples not yet handed to the chart
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Record the metrics logged at the end of `epoch`
    ///
    /// The sample is kept even when growing the chart fails; the unseen
    /// metrics are retried on the next epoch.
    pub fn on_epoch_end(&mut self, epoch: u64, logs: &BTreeMap<String, f64>) -> Result<()> {
        let grown = if self.dynamic {
            self.grow_for(epoch, logs)
        } else {
            Ok(())
        };

        self.backlog.push(Sample {
            x: epoch as f64,
            y: logs.clone(),
        });
        if epoch % self.draw_interval == 0 {
            self.flush();
        }
        grown
    }

    /// Reconfigure for metrics not charted yet
    fn grow_for(&mut self, epoch: u64, logs: &BTreeMap<String, f64>) -> Result<()> {
        let unseen: Vec<&String> = logs
            .keys()
            .filter(|k| !self.known_metrics.contains(*k))
            .collect();
        if unseen.is_empty() {
            return Ok(());
        }
        tracing::debug!("New metric(s) at epoch {}: {:?}", epoch, unseen);

        let candidates: BTreeSet<String> = self
            .known_metrics
            .iter()
            .chain(logs.keys())
            .cloned()
            .collect();
        let settings = infer_settings(
            candidates.iter().map(String::as_str),
            &self.overrides,
            self.epochs,
        );
        self.curve
            .configure(settings)
            .with_context(|| format!("Failed to reconfigure chart at epoch {}", epoch))?;
        self.known_metrics = candidates;
        Ok(())
    }

    fn flush(&mut self) {
        if self.backlog.is_empty() {
            return;
        }
        tracing::trace!("Flushing {} sample(s) to chart", self.backlog.len());
        self.curve.append_all(self.backlog.drain(..));
    }

    /// Flush the backlog and redraw synchronously
    pub fn finish(&mut self) -> Result<()> {
        self.flush();
        if !self.curve.controller().is_configured() {
            return Ok(());
        }
        self.curve.redraw_now()
    }

    pub fn curve(&self) -> &LearningCurve<B> {
        &self.curve
    }

    pub fn into_inner(self) -> LearningCurve<B> {
        self.curve
    }
}
