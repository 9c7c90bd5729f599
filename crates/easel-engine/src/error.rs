//! Error taxonomy.
//!
//! - [`InitError`]: platform, window, or surface creation failed. Fatal.
//! - [`RasterError`]: a rasterization backend call failed during a frame.
//! - [`TransformStackError`]: misuse of the transform stack (programming error).
//! - [`DrawError`]: anything a draw callback can hit.
//! - [`EngineError`]: what [`crate::window::Runtime::run`] surfaces to its caller.

use thiserror::Error;

/// Initialization failure. Each variant carries the backend's diagnostic string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("platform initialization failed: {0}")]
    Platform(String),

    #[error("window creation failed: {0}")]
    Window(String),

    #[error("render surface creation failed: {0}")]
    Surface(String),
}

/// Rasterization operation identifier, used in diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RasterOp {
    Clear,
    Present,
    Line,
    Polygon,
    FillPolygon,
    Circle,
    FillCircle,
}

impl std::fmt::Display for RasterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RasterOp::Clear => "clear",
            RasterOp::Present => "present",
            RasterOp::Line => "line",
            RasterOp::Polygon => "polygon",
            RasterOp::FillPolygon => "fill_polygon",
            RasterOp::Circle => "circle",
            RasterOp::FillCircle => "fill_circle",
        };
        f.write_str(name)
    }
}

/// Per-frame backend failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RasterError {
    /// The backend rejected the call.
    #[error("{op} failed: {message}")]
    Backend { op: RasterOp, message: String },

    /// Geometry the backend cannot rasterize (non-finite coordinates, degenerate polygon).
    #[error("{op} rejected geometry: {reason}")]
    InvalidGeometry { op: RasterOp, reason: &'static str },

    /// The presentation surface is unusable.
    #[error("surface error: {0}")]
    Surface(String),
}

impl RasterError {
    pub fn backend(op: RasterOp, message: impl Into<String>) -> Self {
        RasterError::Backend { op, message: message.into() }
    }
}

#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
pub enum TransformStackError {
    /// `pop` was called with only the base transform left.
    #[error("transform stack underflow: pop called on the base transform")]
    Underflow,
}

/// Error returned from draw callbacks and per-frame engine operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DrawError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Stack(#[from] TransformStackError),

    /// The engine's platform resources were released or transferred away.
    #[error("engine is inactive: its resources were released or transferred")]
    Inactive,
}

/// Top-level error returned by the runtime.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error("frame failed: {0}")]
    Frame(#[from] DrawError),
}
