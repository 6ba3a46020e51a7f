use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the vector renderer.
#[derive(Debug, Error)]
pub enum CadVectorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid caller configuration, reported before any rendering work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("scene has no parts")]
    EmptyScene,

    #[error("camera position coincides with its target")]
    DegenerateCamera,

    #[error("camera up vector is zero or parallel to the view direction")]
    DegenerateUpVector,

    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    #[error("material {field} = {value} is out of range")]
    InvalidMaterial { field: &'static str, value: f64 },

    #[error("scale must be positive and finite, got ({0}, {1})")]
    InvalidScale(f64, f64),

    #[error("invalid zoom: {0}")]
    InvalidZoom(String),

    #[error("margins must be non-negative and finite, got ({0}, {1})")]
    InvalidMargin(f64, f64),

    #[error("line width must be non-negative and finite, got {0}")]
    InvalidLineWidth(f64),

    #[error("opacity must lie in [0, 1], got {0}")]
    InvalidOpacity(f64),

    #[error("invalid dash pattern: {0}")]
    InvalidDashPattern(String),

    #[error("invalid render parameters: {0}")]
    InvalidRenderParams(String),
}

/// Errors tied to individual mesh elements.
///
/// `DegenerateFace` and `BehindCamera` are recoverable: the offending element
/// is skipped and recorded in the render result. The remaining variants
/// describe a malformed mesh and abort the render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("face {face} is degenerate (zero-length normal)")]
    DegenerateFace { face: usize },

    #[error("vertex {vertex} lies at or behind the perspective eye")]
    BehindCamera { vertex: usize },

    #[error("edge {edge} has {count} adjacent faces, expected 1 or 2")]
    InvalidAdjacency { edge: usize, count: usize },

    #[error("{kind} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("edge {edge} is not a side of adjacent face {face}")]
    EdgeNotOnFace { edge: usize, face: usize },

    #[error("edge {edge} joins a vertex to itself")]
    DegenerateEdge { edge: usize },
}

impl GeometryError {
    /// Returns `true` for per-element anomalies that are skipped rather than
    /// aborting the render.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegenerateFace { .. } | Self::BehindCamera { .. })
    }
}

/// Convenience type alias for results using [`CadVectorError`].
pub type Result<T> = std::result::Result<T, CadVectorError>;
