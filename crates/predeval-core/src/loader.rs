//! Prediction file loader.
//!
//! Files hold one record per line, `<ground_truth> <predicted_label>`, both
//! 0 or 1, no header. Loading is fail-fast: the first malformed line aborts
//! with a parse error naming the file and the 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::domain::{EvalError, ModelPredictions, PredictionRecord, Result};

/// Load one model's predictions from `path`.
pub fn load_predictions(model: &str, path: &Path) -> Result<ModelPredictions> {
    let file = File::open(path).map_err(|e| EvalError::io(path, e))?;
    let predictions = parse_predictions(model, BufReader::new(file), path)?;
    debug!(
        model = %model,
        path = %path.display(),
        records = predictions.len(),
        "loaded predictions"
    );
    Ok(predictions)
}

/// Parse predictions from any buffered reader. `source` is only used in
/// error messages.
pub fn parse_predictions<R: BufRead>(
    model: &str,
    reader: R,
    source: &Path,
) -> Result<ModelPredictions> {
    let mut predictions = ModelPredictions::new(model);

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EvalError::io(source, e))?;
        let record = parse_line(&line).map_err(|reason| EvalError::Parse {
            path: source.to_path_buf(),
            line: idx + 1,
            reason,
        })?;
        predictions.push(record);
    }

    Ok(predictions)
}

fn parse_line(line: &str) -> std::result::Result<PredictionRecord, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(format!(
            "expected 2 whitespace-separated tokens, found {}",
            tokens.len()
        ));
    }

    Ok(PredictionRecord {
        ground_truth: parse_label(tokens[0], "ground truth")?,
        predicted: parse_label(tokens[1], "predicted label")?,
    })
}

fn parse_label(token: &str, field: &str) -> std::result::Result<u8, String> {
    let value: i64 = token
        .parse()
        .map_err(|_| format!("{field} {token:?} is not an integer"))?;
    match value {
        0 | 1 => Ok(value as u8),
        other => Err(format!("{field} {other} is not 0 or 1")),
    }
}
