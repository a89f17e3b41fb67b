use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsymmetryError {
    #[error("malformed landmark set: expected {expected} points with 3 components, got shape {rows}x{cols}")]
    MalformedInput {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("landmark index {index} out of range for {len}-point set")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("midline regression undefined: all {count} midline samples share y = {y}")]
    DegenerateMidline { y: f32, count: usize },

    #[error("drawing error: {0}")]
    OpenCv(#[from] opencv::Error),
}

pub type Result<T> = std::result::Result<T, AsymmetryError>;
