//! Domain-level error taxonomy for predeval.

use std::path::PathBuf;

/// predeval domain errors.
///
/// Every variant is fatal to the run; nothing is retried or recovered.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{source_name}: label {value} at position {index} is not 0 or 1")]
    InvalidLabel {
        source_name: String,
        index: usize,
        value: i64,
    },

    #[error("score at position {index} is NaN")]
    InvalidScore { index: usize },

    #[error("length mismatch: {truth} ground-truth labels vs {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },

    #[error("no predictions to evaluate")]
    EmptyInput,

    #[error("ROC AUC is undefined when only one class is present in the ground truth")]
    SingleClass,

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EvalError {
    /// Wrap an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for predeval domain operations.
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_file_and_line() {
        let err = EvalError::Parse {
            path: PathBuf::from("preds/xgb.txt"),
            line: 7,
            reason: "expected 2 tokens, found 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("xgb.txt"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("expected 2 tokens"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = EvalError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("missing.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_length_mismatch_error() {
        let err = EvalError::LengthMismatch {
            truth: 4,
            predicted: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_invalid_score_error_names_position() {
        let err = EvalError::InvalidScore { index: 3 };
        assert_eq!(err.to_string(), "score at position 3 is NaN");
    }

    #[test]
    fn test_invalid_label_error() {
        let err = EvalError::InvalidLabel {
            source_name: "GBDT".to_string(),
            index: 2,
            value: 5,
        };
        assert!(err.to_string().contains("label 5"));
    }
}
