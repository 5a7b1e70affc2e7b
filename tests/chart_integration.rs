//! Integration tests for the live chart
//!
//! These drive a `LearningCurve` through configure, append and frame
//! callbacks and inspect what reached the rendering backend.

mod common;

use common::builders::{loss_and_accuracy, loss_rows, SettingsBuilder};
use common::mock_helpers::{FailingBackend, MockScheduler};
use common::{assert_float_eq, assert_floats_eq};
use lrcurve_rs::render::Orientation;
use lrcurve_rs::{
    AxisLimit, DrawList, LearningCurve, LrCurveError, ManualScheduler, RenderBackend, Sample,
    ScaleKind,
};
use std::rc::Rc;

fn single_loss_facet() -> lrcurve_rs::ChartSettings {
    SettingsBuilder::new()
        .facet("loss", ScaleKind::Linear, AxisLimit::auto())
        .line("train", "#F8766D")
        .map("train", "loss", "train")
        .x_limit(AxisLimit::from_lower(0.0))
        .build()
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_three_epochs_of_loss() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), single_loss_facet()).unwrap();

    chart
        .append_json(r#"[[0, {"train": 1.0}], [1, {"train": 0.5}], [2, {"train": 0.25}]]"#)
        .unwrap();
    assert_eq!(frames.run_frame(), 1);

    let controller = chart.controller();
    let y = controller.subplot("loss").unwrap().y_axis.ticks().unwrap();
    assert!(y.domain.0 <= 0.25 && y.domain.1 >= 1.0);
    assert_floats_eq(&[y.domain.0, y.domain.1], &[0.2, 1.0], 1e-12);

    let x = controller.x_axis().unwrap().ticks().unwrap();
    assert_eq!(x.domain.0, 0.0);
    assert!(x.domain.1 >= 2.0);

    let backend = chart.backend();
    let path = backend.scene().path("loss", "train").unwrap();
    assert_eq!(path.point_count, 3);
    assert_eq!(path.segments.len(), 1);

    // x = 0 sits on the left edge of the plot area, y = 1.0 on the top edge
    let plot = controller.subplot("loss").unwrap().geometry.plot;
    let (px, py) = path.segments[0][0];
    assert_float_eq(px, plot.x, 1e-9);
    assert_float_eq(py, plot.y, 1e-9);
}

#[test]
fn test_two_facets_share_x_axis() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), loss_and_accuracy()).unwrap();
    chart.append_all(
        (0..5).map(|e| {
            Sample::new(e as f64)
                .with("loss", 2.0 - e as f64 * 0.3)
                .with("acc", 0.5 + e as f64 * 0.1)
        }),
    );
    frames.run_frame();

    let backend = chart.backend();
    let scene = backend.scene();
    let acc_x = scene.axis("acc", Orientation::Horizontal).unwrap();
    let loss_x = scene.axis("loss", Orientation::Horizontal).unwrap();
    assert_eq!(acc_x.ticks, loss_x.ticks);

    // Only the bottom facet labels the shared axis
    assert!(!acc_x.show_labels);
    assert!(loss_x.show_labels);

    // Fixed accuracy limit stays put
    let acc_y = scene.axis("acc", Orientation::Vertical).unwrap();
    assert_eq!(acc_y.ticks.domain, (0.0, 1.0));
}

#[test]
fn test_log_facet_splits_on_non_positive_values() {
    let settings = SettingsBuilder::new()
        .facet("loss", ScaleKind::Log10, AxisLimit::auto())
        .line("train", "#F8766D")
        .map("loss", "loss", "train")
        .build();
    let frames = Rc::new(ManualScheduler::new());
    let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), settings).unwrap();

    chart.append(Sample::new(0.0).with("loss", 1.0));
    chart.append(Sample::new(1.0).with("loss", 0.0));
    chart.append(Sample::new(2.0).with("loss", 0.5));
    frames.run_frame();
    assert!(chart.take_frame_error().is_none());

    let y = chart.controller().subplot("loss").unwrap().y_axis.ticks().cloned().unwrap();
    assert!(y.domain.0 > 0.0 && y.domain.0 <= 0.5);
    assert!(y.domain.1 >= 1.0);

    let backend = chart.backend();
    let path = backend.scene().path("loss", "train").unwrap();
    assert_eq!(path.point_count, 3);
    assert_eq!(path.segments.len(), 2);
}

#[test]
fn test_first_point_keeps_fixed_bounds() {
    let settings = SettingsBuilder::new()
        .facet("loss", ScaleKind::Linear, AxisLimit::from_lower(0.0))
        .facet("acc", ScaleKind::Linear, AxisLimit::new(None, Some(1.0)))
        .line("train", "#F8766D")
        .map("train", "loss", "train")
        .map("acc", "acc", "train")
        .x_limit(AxisLimit::from_lower(0.0))
        .build();
    let frames = Rc::new(ManualScheduler::new());
    let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), settings).unwrap();

    chart.append(Sample::new(0.0).with("train", 0.0).with("acc", 1.0));
    assert_eq!(frames.run_frame(), 1);

    let controller = chart.controller();
    let x = controller.x_axis().unwrap().ticks().unwrap();
    assert_eq!(x.domain, (0.0, 1.0));

    let loss = controller.subplot("loss").unwrap().y_axis.ticks().unwrap();
    assert_eq!(loss.domain, (0.0, 1.0));

    let acc = controller.subplot("acc").unwrap().y_axis.ticks().unwrap();
    assert_eq!(acc.domain.1, 1.0);
    assert!(acc.domain.0 < 1.0);
}

// ============================================================================
// Frame scheduling
// ============================================================================

#[test]
fn test_appends_within_a_frame_schedule_once() {
    let mut scheduler = MockScheduler::new();
    scheduler.expect_schedule_once().times(1).return_const(());

    let chart =
        LearningCurve::with_settings(DrawList::new(), Rc::new(scheduler), single_loss_facet())
            .unwrap();
    for row in loss_rows(50) {
        chart.append(row);
    }
    assert!(chart.controller().is_pending());
}

#[test]
fn test_inline_scheduler_schedules_per_append() {
    let mut scheduler = MockScheduler::new();
    scheduler
        .expect_schedule_once()
        .times(3)
        .returning(|callback| callback());

    let chart =
        LearningCurve::with_settings(DrawList::new(), Rc::new(scheduler), single_loss_facet())
            .unwrap();
    chart.append(Sample::new(0.0).with("train", 1.0));
    chart.append(Sample::new(1.0).with("train", 0.5));
    assert_eq!(chart.controller().frames_drawn(), 3);
}

#[test]
fn test_unconfigured_chart_schedules_nothing() {
    let mut scheduler = MockScheduler::new();
    scheduler.expect_schedule_once().times(0);

    let chart = LearningCurve::new(DrawList::new(), Rc::new(scheduler));
    chart.append(Sample::new(0.0).with("loss", 1.0));
    assert_eq!(chart.controller().store().total_points(), 0);
}

#[test]
fn test_redraw_now_keeps_one_callback_in_flight() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), single_loss_facet()).unwrap();
    chart.append(Sample::new(0.0).with("train", 1.0));
    assert_eq!(frames.pending(), 1);

    chart.redraw_now().unwrap();
    assert!(chart.controller().is_pending());

    chart.append(Sample::new(1.0).with("train", 0.5));
    assert_eq!(frames.pending(), 1);

    assert_eq!(frames.run_frame(), 1);
    assert_eq!(chart.controller().frames_drawn(), 2);
    assert!(!chart.controller().is_pending());
    assert_eq!(chart.backend().scene().path("loss", "train").unwrap().point_count, 2);
}

#[test]
fn test_redraw_is_idempotent() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), loss_and_accuracy()).unwrap();
    chart.append_all(loss_rows(8));
    frames.run_frame();

    let scene = chart.backend().scene().clone();
    chart.backend_mut().reset_stats();

    chart.request_redraw();
    frames.run_frame();

    let backend = chart.backend();
    assert_eq!(backend.scene(), &scene);
    let stats = backend.stats();
    assert_eq!(stats.axis_updates, 0);
    assert_eq!(stats.clears, 0);
    // Four lines: two per facet, the empty accuracy buffers included
    assert_eq!(stats.path_updates, 4);
}

#[test]
fn test_stale_callback_after_reconfigure() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), single_loss_facet()).unwrap();
    chart.append(Sample::new(0.0).with("train", 1.0));

    chart.configure(loss_and_accuracy()).unwrap();
    assert_eq!(frames.pending(), 2);
    assert_eq!(frames.run_frame(), 2);
    assert_eq!(chart.controller().frames_drawn(), 1);
}

#[test]
fn test_reconfigure_preserves_data() {
    let first = SettingsBuilder::new()
        .facet("facetA", ScaleKind::Linear, AxisLimit::auto())
        .line("s1", "red")
        .map("a", "facetA", "s1")
        .build();
    let second = SettingsBuilder::new()
        .facet("facetA", ScaleKind::Linear, AxisLimit::auto())
        .facet("facetB", ScaleKind::Linear, AxisLimit::auto())
        .line("s1", "red")
        .line("s2", "blue")
        .map("a", "facetA", "s1")
        .map("b", "facetB", "s2")
        .build();

    let frames = Rc::new(ManualScheduler::new());
    let chart = LearningCurve::with_settings(DrawList::new(), frames.clone(), first).unwrap();
    for x in 0..3 {
        chart.append(Sample::new(x as f64).with("a", x as f64));
    }
    chart.configure(second).unwrap();

    {
        let controller = chart.controller();
        let store = controller.store();
        assert_eq!(store.buffer("facetA", "s1").unwrap().len(), 3);
        assert!(store.buffer("facetB", "s2").unwrap().is_empty());
    }

    frames.run_until_idle(4);
    assert_eq!(chart.backend().scene().path("facetA", "s1").unwrap().point_count, 3);
}

#[test]
fn test_invalid_reconfigure_keeps_chart() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), single_loss_facet()).unwrap();

    let bad = SettingsBuilder::new()
        .facet("loss", ScaleKind::Linear, AxisLimit::fixed(1.0, f64::INFINITY))
        .line("train", "red")
        .map("train", "loss", "train")
        .build();
    assert!(chart.configure(bad).unwrap_err().is_config());
    assert_eq!(chart.controller().generation(), 1);
    assert_eq!(chart.backend().stats().clears, 1);
}

// ============================================================================
// Backend errors
// ============================================================================

#[test]
fn test_frame_error_is_parked_on_handle() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(FailingBackend::new(), frames.clone(), single_loss_facet())
            .unwrap();
    frames.run_frame();

    chart.backend_mut().fail_paths = true;
    chart.append(Sample::new(0.0).with("train", 1.0));
    frames.run_frame();

    let err = chart.take_frame_error().unwrap();
    assert!(matches!(err, LrCurveError::Render(_)));
    assert!(chart.take_frame_error().is_none());

    assert!(chart.redraw_now().is_err());

    chart.backend_mut().fail_paths = false;
    chart.redraw_now().unwrap();
    assert_eq!(chart.backend().inner.scene().path("loss", "train").unwrap().point_count, 1);
}

#[test]
fn test_boxed_backend() {
    let backend: Box<dyn RenderBackend> = Box::new(DrawList::new());
    let frames = Rc::new(ManualScheduler::new());
    let chart = LearningCurve::with_settings(backend, frames.clone(), single_loss_facet()).unwrap();
    chart.append_all((0..3).map(|e| Sample::new(e as f64).with("train", 1.0 / (e + 1) as f64)));
    assert_eq!(frames.run_frame(), 1);
    assert_eq!(chart.controller().frames_drawn(), 1);
    assert!(chart.take_frame_error().is_none());
}

#[test]
fn test_svg_snapshot_of_live_chart() {
    let frames = Rc::new(ManualScheduler::new());
    let chart =
        LearningCurve::with_settings(DrawList::new(), frames.clone(), loss_and_accuracy()).unwrap();
    chart.append_all(loss_rows(5));
    frames.run_frame();

    let svg = chart.backend().to_svg().unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.to_uppercase().contains("#F8766D"));
    assert!(svg.contains("Epoch"));
    assert!(svg.trim_end().ends_with("</svg>"));
}
