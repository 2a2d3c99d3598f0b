//! Error types for terrain generation.

/// Errors raised at the boundary of a terrain operation.
///
/// Grid transforms themselves never fail once their preconditions hold; these
/// variants describe the preconditions a caller can violate.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Two grids that must share dimensions do not.
    #[error("grid size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The operation requires a square grid.
    #[error("grid must be square, got {width}x{height}")]
    NotSquare { width: usize, height: usize },

    /// A layer list that must hold at least one entry is empty.
    #[error("{0} list must contain at least one entry")]
    EmptyLayers(&'static str),

    /// A parameter is outside the range the algorithm can run with.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Failed to read or write a file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize a JSON configuration.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Failed to encode a preview image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
