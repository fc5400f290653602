//! End-to-end tests for the load → score → render pipeline.

use std::path::{Path, PathBuf};

use predeval_core::{
    run_evaluation_with_output, EvalError, EvalRequest, ModelRoster, RenderOptions, DEFAULT_DPI,
};

const TEST_RENDER: RenderOptions = RenderOptions {
    dpi: 50,
    show: false,
};

fn write_preds(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write prediction file");
    path
}

fn four_model_inputs(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_preds(dir, "xgb.txt", "1 1\n0 0\n1 0\n0 1\n"),
        write_preds(dir, "lgbm.txt", "1 1\n0 0\n1 1\n0 0\n"),
        write_preds(dir, "gbdt.txt", "1 0\n0 1\n1 0\n0 1\n"),
        write_preds(dir, "nn.txt", "1 1\n0 1\n1 1\n0 0\n1 0\n0 0\n"),
    ]
}

fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

#[test]
fn nested_missing_output_dir_gets_five_images() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out_root = tempfile::tempdir().expect("tempdir");
    let output_dir = out_root.path().join("level1").join("level2");
    assert!(!output_dir.exists());

    let files = four_model_inputs(inputs.path());
    let request =
        EvalRequest::from_paths(&output_dir, &files, &ModelRoster::default(), TEST_RENDER)
            .expect("valid request");

    let mut stdout = Vec::new();
    let outcome = run_evaluation_with_output(&request, &mut stdout).expect("run succeeds");

    assert_eq!(outcome.artifacts().len(), 5);
    assert_eq!(
        png_files(&output_dir),
        vec![
            "GBDT.png",
            "LightGBM.png",
            "Neural Network.png",
            "ROC_AUC.png",
            "XGBoost.png",
        ]
    );
    for path in outcome.artifacts() {
        let bytes = std::fs::read(path).expect("read image");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{path:?} is not a PNG");
    }
}

#[test]
fn console_report_follows_model_order() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let files = four_model_inputs(inputs.path());
    let request =
        EvalRequest::from_paths(out.path(), &files, &ModelRoster::default(), TEST_RENDER)
            .expect("valid request");

    let mut stdout = Vec::new();
    let outcome = run_evaluation_with_output(&request, &mut stdout).expect("run succeeds");
    let text = String::from_utf8(stdout).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 12);
    // XGBoost: balanced scenario
    assert_eq!(&lines[0..3], &["F1: 0.5000", "ROC AUC: 0.5000", "Accuracy: 0.5000"]);
    // LightGBM: perfect
    assert_eq!(&lines[3..6], &["F1: 1.0000", "ROC AUC: 1.0000", "Accuracy: 1.0000"]);
    // GBDT: fully inverted
    assert_eq!(&lines[6..9], &["F1: 0.0000", "ROC AUC: 0.0000", "Accuracy: 0.0000"]);

    let names: Vec<&str> = outcome.metrics.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(names, vec!["XGBoost", "LightGBM", "GBDT", "Neural Network"]);
    assert_eq!(outcome.metrics[0].confusion.as_rows(), [[1, 1], [1, 1]]);
}

#[test]
fn malformed_line_aborts_before_any_image() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out_root = tempfile::tempdir().expect("tempdir");
    let output_dir = out_root.path().join("plots");

    let mut files = four_model_inputs(inputs.path());
    files[3] = write_preds(inputs.path(), "broken.txt", "1 1\n1\n");

    let request =
        EvalRequest::from_paths(&output_dir, &files, &ModelRoster::default(), TEST_RENDER)
            .expect("valid request");
    let mut stdout = Vec::new();
    let err = run_evaluation_with_output(&request, &mut stdout).unwrap_err();

    assert!(matches!(err, EvalError::Parse { line: 2, .. }), "got {err:?}");
    assert!(!output_dir.exists());
    assert!(stdout.is_empty());
}

#[test]
fn missing_prediction_file_is_io_error() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let files = vec![inputs.path().join("nope.txt")];
    let request = EvalRequest::from_paths(out.path(), &files, &ModelRoster::default(), TEST_RENDER)
        .expect("valid request");

    let err = run_evaluation_with_output(&request, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, EvalError::Io { .. }));
}

#[test]
fn single_class_ground_truth_aborts() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out_root = tempfile::tempdir().expect("tempdir");
    let output_dir = out_root.path().join("plots");
    let files = vec![write_preds(inputs.path(), "ones.txt", "1 1\n1 0\n")];
    let request =
        EvalRequest::from_paths(&output_dir, &files, &ModelRoster::default(), TEST_RENDER)
            .expect("valid request");

    let err = run_evaluation_with_output(&request, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, EvalError::SingleClass));
    assert!(!output_dir.exists());
}

#[test]
fn empty_prediction_file_aborts() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let files = vec![write_preds(inputs.path(), "empty.txt", "")];
    let request = EvalRequest::from_paths(out.path(), &files, &ModelRoster::default(), TEST_RENDER)
        .expect("valid request");

    let err = run_evaluation_with_output(&request, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, EvalError::EmptyInput));
}

#[test]
fn repeated_runs_are_identical() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out_a = tempfile::tempdir().expect("tempdir");
    let out_b = tempfile::tempdir().expect("tempdir");
    let files = four_model_inputs(inputs.path());
    let roster = ModelRoster::default();

    let mut stdout_a = Vec::new();
    let mut stdout_b = Vec::new();
    let req_a = EvalRequest::from_paths(out_a.path(), &files, &roster, TEST_RENDER).unwrap();
    let req_b = EvalRequest::from_paths(out_b.path(), &files, &roster, TEST_RENDER).unwrap();
    run_evaluation_with_output(&req_a, &mut stdout_a).expect("first run");
    run_evaluation_with_output(&req_b, &mut stdout_b).expect("second run");

    assert_eq!(stdout_a, stdout_b);
    for name in png_files(out_a.path()) {
        let a = std::fs::read(out_a.path().join(&name)).expect("read a");
        let b = std::fs::read(out_b.path().join(&name)).expect("read b");
        assert!(a == b, "{name} differs between runs");
    }
}

#[test]
fn fewer_files_than_models_renders_only_those() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let files = vec![write_preds(inputs.path(), "xgb.txt", "1 1\n0 0\n")];
    let request = EvalRequest::from_paths(out.path(), &files, &ModelRoster::default(), TEST_RENDER)
        .expect("valid request");

    run_evaluation_with_output(&request, &mut Vec::new()).expect("run succeeds");
    assert_eq!(png_files(out.path()), vec!["ROC_AUC.png", "XGBoost.png"]);
}

/// Width and height from a PNG's IHDR chunk.
fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(&bytes[12..16], b"IHDR");
    let width = u32::from_be_bytes(bytes[16..20].try_into().expect("width"));
    let height = u32::from_be_bytes(bytes[20..24].try_into().expect("height"));
    (width, height)
}

#[test]
fn default_dpi_renders_full_size_figures() {
    let inputs = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let files = vec![write_preds(inputs.path(), "xgb.txt", "1 1\n0 0\n1 0\n0 1\n")];
    let render = RenderOptions::default();
    let request = EvalRequest::from_paths(out.path(), &files, &ModelRoster::default(), render)
        .expect("valid request");
    assert_eq!(request.render.dpi, DEFAULT_DPI);

    let outcome = run_evaluation_with_output(&request, &mut Vec::new()).expect("run succeeds");
    for path in outcome.artifacts() {
        let bytes = std::fs::read(path).expect("read image");
        assert_eq!(png_dimensions(&bytes), (3840, 2880), "{path:?}");
    }
}
