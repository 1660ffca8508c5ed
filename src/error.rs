use std::fmt;

/// Errors surfaced by level ingestion and the level API.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelError {
    /// Edge endpoints are the same vertex
    InvalidEdge { a: u32, b: u32 },
    /// Unknown vertex, edge, clash or group id
    InvalidId { kind: &'static str, id: u32 },
    /// Non-finite coordinate at the boundary
    NonFinite { param: &'static str },
    /// Finite but outside accepted bounds
    OutOfRange { param: &'static str, got: f64 },
    /// Ingestion cap exceeded
    LimitExceeded {
        what: &'static str,
        max: usize,
        got: usize,
    },
    /// Clash bookkeeping disagrees with itself. Never expected in correct operation.
    InternalInconsistency(String),
    /// Vertex belongs to a group and only moves with it
    VertexGrouped(u32),
    /// Operation needs a started level
    NotRunning,
    /// Malformed level document
    Json(String),
}

impl LevelError {
    /// Stable machine-readable code, used by the wasm facade.
    pub fn code(&self) -> &'static str {
        match self {
            LevelError::InvalidEdge { .. } => "invalid_edge",
            LevelError::InvalidId { .. } => "invalid_id",
            LevelError::NonFinite { .. } => "non_finite",
            LevelError::OutOfRange { .. } => "out_of_range",
            LevelError::LimitExceeded { .. } => "limit_exceeded",
            LevelError::InternalInconsistency(_) => "internal_inconsistency",
            LevelError::VertexGrouped(_) => "vertex_grouped",
            LevelError::NotRunning => "not_running",
            LevelError::Json(_) => "json_parse",
        }
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::InvalidEdge { a, b } => {
                write!(f, "edge {}-{} must join two distinct vertices", a, b)
            }
            LevelError::InvalidId { kind, id } => write!(f, "invalid {} id {}", kind, id),
            LevelError::NonFinite { param } => write!(f, "parameter '{}' must be finite", param),
            LevelError::OutOfRange { param, got } => {
                write!(f, "parameter '{}' out of range: {}", param, got)
            }
            LevelError::LimitExceeded { what, max, got } => {
                write!(f, "too many {}: {} (max {})", what, got, max)
            }
            LevelError::InternalInconsistency(msg) => write!(f, "internal inconsistency: {}", msg),
            LevelError::VertexGrouped(id) => {
                write!(f, "vertex {} is grouped and moves with its group", id)
            }
            LevelError::NotRunning => write!(f, "no level is started"),
            LevelError::Json(msg) => write!(f, "invalid level data: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Json(e.to_string())
    }
}
