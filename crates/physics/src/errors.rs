use crate::{BodyId, FixtureId};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AabbError {
    #[error("Attempted to create an AABB whose lower corner is not below and to the left of its upper corner")]
    AabbInvalidDims,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("Circle radius must be positive and finite, got {}", _0)]
    InvalidRadius(f64),

    #[error("A polygon needs between 3 and {} vertices, got {}", crate::MAX_POLYGON_VERTICES, _0)]
    InvalidVertexCount(usize),

    #[error("Polygon vertices do not describe a convex shape")]
    NotConvex,

    #[error("Geometry contains an edge of (nearly) zero length at vertex {}", _0)]
    DegenerateEdge(usize),

    #[error("A chain needs at least {} vertices, got {}", _0, _1)]
    ChainTooShort(usize, usize),

    #[error("Geometry contains a non-finite coordinate")]
    NonFinite,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("AAbb error: {}", _0)]
    Aabb(#[from] AabbError),

    #[error("Shape error: {}", _0)]
    Shape(#[from] ShapeError),

    #[error("No body {} in this world", _0)]
    UnknownBody(BodyId),

    #[error("No fixture {} in this world", _0)]
    UnknownFixture(FixtureId),

    #[error("Body transforms must have a finite position and rotation")]
    NonFiniteTransform,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
