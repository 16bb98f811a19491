/// Errors produced when a frame cannot be interpreted as a binary mask.
///
/// Missing lane evidence is *not* an error; detectors report it as `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LaneError {
    #[error("invalid mask dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid mask buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("mask row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
}
