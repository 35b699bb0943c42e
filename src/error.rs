use thiserror::Error;

/// Top-level error type for the polybool engine.
#[derive(Debug, Error)]
pub enum PolyBoolError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the polygon store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("face ring is not closed")]
    RingNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to boolean operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unresolved touching point at ({x}, {y})")]
    UnresolvedTouching { x: f64, y: f64 },

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PolyBoolError`].
pub type Result<T, E = PolyBoolError> = std::result::Result<T, E>;
