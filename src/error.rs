//! Error types for the geometry engine.

use planar_types::DimensionMismatch;

/// Every failure the engine reports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Malformed WKT or WKB input. `position` is a character offset for WKT
    /// and a byte offset for WKB.
    #[error("parse error at position {position}: {message}")]
    Parse { message: String, position: usize },

    /// A constructor rejected its input (ring not closed, too few points,
    /// holes without a shell, non-finite ordinates, mixed dimensions).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The overlay could not build a consistent topology.
    #[error("topology error: {0}")]
    Topology(String),

    /// An operation was applied to the wrong kind of geometry.
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// Component, ring or coordinate index past the end.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Input larger than the configured coordinate ceiling.
    #[error("input has {count} coordinates, the configured limit is {limit}")]
    ComplexityLimit { count: usize, limit: usize },

    /// Bad numeric argument (negative tolerance, NaN distance, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GeometryError {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        GeometryError::Parse {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry(message.into())
    }

    pub(crate) fn topology(message: impl Into<String>) -> Self {
        GeometryError::Topology(message.into())
    }
}

impl From<DimensionMismatch> for GeometryError {
    fn from(err: DimensionMismatch) -> Self {
        GeometryError::InvalidGeometry(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
