//! Visualization rendering: file naming, counter threading, fit facts, and
//! write atomicity.

use approx::assert_relative_eq;
use serde_json::{json, Value};

use flownode::request::Request;
use flownode::{invoke, ops};

fn request(payload: Value) -> Request {
    serde_json::from_value(payload).unwrap()
}

#[test]
fn counter_names_the_output_file_and_advances() {
    let dir = tempfile::tempdir().unwrap();
    let envelope = ops::execute(&request(json!({
        "nodeId": "n1",
        "operation": "visualize",
        "vizType": "line",
        "inputData": [1, 3, 2, 5, 4],
        "outputDir": dir.path(),
        "filenamePattern": "viz_x",
        "counter": 5,
        "vizParams": { "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    })))
    .unwrap();

    let expected = dir.path().join("viz_x_005.png");
    assert_eq!(
        envelope["result"]["output_path"],
        json!(expected.display().to_string())
    );
    assert!(expected.is_file());
    assert_eq!(envelope["nextCounter"], json!(6));
    assert_eq!(envelope["vizType"], json!("line"));
    assert_eq!(envelope["operation"], json!("visualize"));
}

#[test]
fn fit_line_reports_slope_and_intercept() {
    let dir = tempfile::tempdir().unwrap();
    let values: Vec<f64> = (0..12).map(|x| 2.0 * x as f64 + 3.0).collect();
    let envelope = ops::execute(&request(json!({
        "operation": "visualize",
        "vizType": "fit_line",
        "inputData": values,
        "outputDir": dir.path(),
        "counter": 1,
        "vizParams": { "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    })))
    .unwrap();

    let result = &envelope["result"];
    assert_relative_eq!(result["slope"].as_f64().unwrap(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(result["intercept"].as_f64().unwrap(), 3.0, epsilon = 1e-6);
    let path = result["output_path"].as_str().unwrap();
    assert!(std::path::Path::new(path).is_file());
}

#[test]
fn non_fit_kinds_omit_fit_facts() {
    let dir = tempfile::tempdir().unwrap();
    let envelope = ops::execute(&request(json!({
        "operation": "visualize",
        "vizType": "scatter",
        "inputData": [1, 2, 3],
        "outputDir": dir.path(),
        "vizParams": { "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    })))
    .unwrap();
    assert!(envelope["result"].get("slope").is_none());
    assert!(envelope["result"].get("intercept").is_none());
}

#[test]
fn histogram_renders_with_custom_style() {
    let dir = tempfile::tempdir().unwrap();
    let values: Vec<f64> = (0..100).map(|i| ((i * 37) % 100) as f64 / 10.0).collect();
    let envelope = ops::execute(&request(json!({
        "operation": "visualize",
        "vizType": "histogram",
        "inputData": values,
        "outputDir": dir.path(),
        "vizParams": { "bins": 8, "color": "#336699", "alpha": 0.5, "title": "Spread",
                       "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    })))
    .unwrap();
    let path = envelope["result"]["output_path"].as_str().unwrap();
    assert!(std::path::Path::new(path).is_file());
}

#[test]
fn svg_extension_selects_the_svg_backend() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("plot.svg");
    ops::execute(&request(json!({
        "operation": "visualize",
        "vizType": "line",
        "inputData": [0, 1, 0, -1, 0],
        "outputPath": target,
    })))
    .unwrap();

    let contents = std::fs::read_to_string(&target).unwrap();
    assert!(contents.contains("<svg"));
}

#[test]
fn single_numeric_column_table_is_plottable() {
    let dir = tempfile::tempdir().unwrap();
    let envelope = ops::execute(&request(json!({
        "operation": "visualize",
        "vizType": "line",
        "inputData": { "signal": [1, 2, 1, 2] },
        "outputDir": dir.path(),
        "vizParams": { "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    })))
    .unwrap();
    let path = envelope["result"]["output_path"].as_str().unwrap();
    assert!(std::path::Path::new(path).is_file());
}

#[test]
fn failed_fit_leaves_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let (envelope, to_stdout) = invoke(&request(json!({
        "operation": "visualize",
        "vizType": "fit_line",
        "inputData": [42],
        "outputDir": dir.path(),
        "filenamePattern": "broken",
    })));
    assert!(to_stdout);
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .contains("at least 2 points"));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .map(|rd| rd.filter_map(|e| e.ok()).collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty(), "no partial output expected");
}

#[test]
fn missing_input_is_a_structured_error() {
    let (envelope, to_stdout) = invoke(&request(json!({
        "nodeId": "n9",
        "operation": "visualize",
        "vizType": "line",
    })));
    assert!(to_stdout);
    assert_eq!(
        envelope["error"],
        json!("No input data provided for visualization")
    );
}

#[test]
fn unknown_viz_type_is_a_structured_error() {
    let (envelope, to_stdout) = invoke(&request(json!({
        "operation": "visualize",
        "vizType": "sparkline",
        "inputData": [1, 2, 3],
    })));
    assert!(to_stdout);
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .contains("Unknown visualization type: sparkline"));
}

#[test]
fn rendering_twice_overwrites_silently() {
    let dir = tempfile::tempdir().unwrap();
    let payload = json!({
        "operation": "visualize",
        "vizType": "line",
        "inputData": [1, 2, 3],
        "outputDir": dir.path(),
        "filenamePattern": "same",
        "counter": 1,
        "vizParams": { "fig_width": 4.0, "fig_height": 3.0, "dpi": 100.0 },
    });
    ops::execute(&request(payload.clone())).unwrap();
    ops::execute(&request(payload)).unwrap();
    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(files.len(), 1);
}
