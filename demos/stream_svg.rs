//! Simulated training run rendered to an SVG snapshot
//!
//! Run with: cargo run --example stream_svg -- [output.svg] [settings.{json,toml}]
//!
//! Without a settings file the chart is inferred from the logged metrics,
//! growing an accuracy facet once validation accuracy starts being reported.

use anyhow::Context;
use lrcurve_rs::config::InferOverrides;
use lrcurve_rs::{DrawList, EpochRecorder, LearningCurve, ManualScheduler, Sample};
use std::collections::BTreeMap;
use std::env;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EPOCHS: u64 = 30;

fn epoch_logs(epoch: u64) -> BTreeMap<String, f64> {
    let t = epoch as f64;
    let mut logs = BTreeMap::new();
    logs.insert("loss".to_string(), 2.0 * (-t / 8.0).exp() + 0.05);
    logs.insert("val_loss".to_string(), 2.1 * (-t / 9.0).exp() + 0.12 + 0.002 * t);
    if epoch >= 5 {
        logs.insert("acc".to_string(), 1.0 - 0.9 * (-t / 6.0).exp());
        logs.insert("val_acc".to_string(), 0.95 - 0.9 * (-t / 7.0).exp());
    }
    logs
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lrcurve_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let output = args.get(1).map(String::as_str).unwrap_or("learning_curve.svg");
    let frames = Rc::new(ManualScheduler::new());

    let chart = match args.get(2) {
        Some(path) => {
            tracing::info!("Streaming with settings from {}", path);
            let settings = lrcurve_rs::ChartSettings::load(path)
                .with_context(|| format!("loading settings from {}", path))?;
            let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), settings)?;
            for epoch in 0..EPOCHS {
                let mut sample = Sample::new(epoch as f64);
                sample.y = epoch_logs(epoch);
                chart.append(sample);
                frames.run_frame();
            }
            chart.redraw_now()?;
            chart
        }
        None => {
            tracing::info!("Streaming {} epochs with inferred settings", EPOCHS);
            let curve = LearningCurve::new(DrawList::new(), frames.clone());
            let mut recorder = EpochRecorder::new(curve, 2, InferOverrides::default(), Some(EPOCHS))?;
            for epoch in 0..EPOCHS {
                recorder.on_epoch_end(epoch, &epoch_logs(epoch))?;
                frames.run_frame();
            }
            recorder.finish()?;
            recorder.into_inner()
        }
    };

    if let Some(err) = chart.take_frame_error() {
        return Err(err).context("a frame failed to render");
    }

    let stats = chart.backend().stats();
    tracing::info!(
        "Drew {} frame(s): {} path and {} axis update(s)",
        chart.controller().frames_drawn(),
        stats.path_updates,
        stats.axis_updates
    );

    let svg = chart.backend().to_svg()?;
    std::fs::write(output, svg).with_context(|| format!("writing {}", output))?;
    println!("Wrote {}", output);
    Ok(())
}
