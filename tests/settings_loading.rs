//! Integration tests for settings files and inference

mod common;

use lrcurve_rs::config::InferOverrides;
use lrcurve_rs::{
    infer_settings, AxisLimit, ChannelTarget, ChartSettings, DrawList, LearningCurve,
    ManualScheduler, ScaleKind,
};
use std::io::Write;
use std::rc::Rc;
use tempfile::{Builder, NamedTempFile};

const JSON_SETTINGS: &str = r##"{
    "mappings": {
        "loss": {"facet": "loss", "line": "train"},
        "val_loss": {"facet": "loss", "line": "validation"}
    },
    "facetConfig": {
        "loss": {"name": "Loss", "scale": "log10", "limit": [null, null]}
    },
    "lineConfig": {
        "train": {"name": "Train", "color": "#F8766D"},
        "validation": {"name": "Validation", "color": "#00BFC4"}
    },
    "xAxisConfig": {"name": "Epoch", "limit": [0.0, 9.0]}
}"##;

const TOML_SETTINGS: &str = r##"
[dimensions]
height = 490.0
width = 800.0

[mappings.acc]
facet = "accuracy"
line = "train"

[mappings.lr]
facet = "lr"
line = "train"

[facetConfig.accuracy]
name = "Accuracy"
limit = [0.0, 1.0]

[facetConfig.lr]
name = "Learning Rate"
limit = [0.0, "auto"]

[lineConfig.train]
name = "Train"
color = "#F8766D"

[xAxisConfig]
name = "Step"
"##;

fn settings_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_json_settings() {
    let file = settings_file(".json", JSON_SETTINGS);
    let settings = ChartSettings::load(file.path()).unwrap();

    assert_eq!(settings.dimensions.width, 600.0);
    assert_eq!(settings.facet_config["loss"].scale, ScaleKind::Log10);
    assert_eq!(settings.facet_config["loss"].limit, AxisLimit::auto());
    assert_eq!(settings.x_axis_config.limit, AxisLimit::fixed(0.0, 9.0));
    assert_eq!(
        settings.mappings["val_loss"],
        ChannelTarget::new("loss", "validation")
    );
}

#[test]
fn test_load_toml_settings() {
    let file = settings_file(".toml", TOML_SETTINGS);
    let settings = ChartSettings::load(file.path()).unwrap();

    assert_eq!(settings.dimensions.width, 800.0);
    assert_eq!(settings.facet_config["accuracy"].scale, ScaleKind::Linear);
    assert_eq!(settings.facet_config["lr"].limit, AxisLimit::from_lower(0.0));
    assert_eq!(settings.x_axis_config.name, "Step");
    assert_eq!(settings.x_axis_config.limit, AxisLimit::from_lower(0.0));
    assert_eq!(settings.facet_order(), vec!["accuracy", "lr"]);
}

#[test]
fn test_loaded_settings_drive_a_chart() {
    let file = settings_file(".toml", TOML_SETTINGS);
    let settings = ChartSettings::load(file.path()).unwrap();

    let frames = Rc::new(ManualScheduler::new());
    let chart = LearningCurve::with_settings(DrawList::new(), frames, settings).unwrap();
    let controller = chart.controller();
    assert_eq!(controller.subplots().len(), 2);
    assert_eq!(controller.layout().unwrap().width, 800.0);
}

#[test]
fn test_json_round_trip_through_file() {
    let settings = ChartSettings::default();
    let file = settings_file(".json", &settings.to_json_string().unwrap());
    assert_eq!(ChartSettings::load(file.path()).unwrap(), settings);
}

#[test]
fn test_unsupported_extension() {
    let file = settings_file(".yaml", "mappings: {}");
    let err = ChartSettings::load(file.path()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ChartSettings::load(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
    assert!(!err.is_config());
}

#[test]
fn test_malformed_and_invalid_files() {
    let file = settings_file(".json", "{ not json");
    let err = ChartSettings::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Serialization error"));

    let unknown_line = JSON_SETTINGS.replace(r#""line": "validation""#, r#""line": "test""#);
    let file = settings_file(".json", &unknown_line);
    let err = ChartSettings::load(file.path()).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("unknown line 'test'"));

    let zero_log_bound = JSON_SETTINGS.replace("[null, null]", "[0.0, null]");
    let file = settings_file(".json", &zero_log_bound);
    assert!(ChartSettings::load(file.path()).unwrap_err().is_config());
}

#[test]
fn test_overrides_from_json() {
    let overrides: InferOverrides = serde_json::from_str(
        r#"{"width": 900, "facetConfig": {"loss": {"scale": "linear"}}}"#,
    )
    .unwrap();
    assert!(!overrides.has_mappings());

    let settings = infer_settings(["loss", "val_loss"], &overrides, Some(5));
    settings.validate().unwrap();
    assert_eq!(settings.dimensions.width, 900.0);
    assert_eq!(settings.facet_config["loss"].scale, ScaleKind::Linear);
    assert_eq!(settings.facet_config["loss"].name, "Loss");
    assert_eq!(settings.x_axis_config.limit, AxisLimit::fixed(0.0, 4.0));
}
