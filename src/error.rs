//! Error types for the timezone compiler
//!
//! Every failure is fatal: the compiler aborts on the first error and leaves
//! no artifact at the canonical output path.

/// All the ways a compilation run can fail
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The polygon data itself is defective (odd coordinate count,
    /// odd number of crossings on a sweep line, degenerate ring)
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The shortcut refinement produced a result that cannot be correct
    #[error("algorithm invariant violated for polygon {polygon}: {reason}")]
    AlgorithmInvariantViolation { polygon: usize, reason: String },

    /// Two independent address computations disagree, or a value does not
    /// fit its field in the binary format
    #[error("format consistency error: {0}")]
    FormatConsistency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        let err = CompileError::MalformedInput("odd crossing count".to_string());
        assert_eq!(err.to_string(), "malformed input: odd crossing count");

        let err = CompileError::AlgorithmInvariantViolation {
            polygon: 7,
            reason: "fewer than 3 cells".to_string(),
        };
        assert!(err.to_string().contains("polygon 7"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CompileError = io.into();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
