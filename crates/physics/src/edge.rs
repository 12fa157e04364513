//! A single line segment.
use crate::errors::*;
use crate::*;

/// A two-sided line segment in body space.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    v1: V2,
    v2: V2,
}

impl Edge {
    pub fn new(v1: V2, v2: V2) -> Result<Edge, ShapeError> {
        if !(v1.is_finite() && v2.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        if v1.distance_squared(&v2) < MIN_EDGE_LENGTH * MIN_EDGE_LENGTH {
            return Err(ShapeError::DegenerateEdge(0));
        }

        Ok(Edge { v1, v2 })
    }

    pub fn get_vertices(&self) -> (&V2, &V2) {
        (&self.v1, &self.v2)
    }

    pub fn get_bounding_box(&self, transform: &Transform) -> Aabb {
        Aabb::enclosing([transform.apply(&self.v1), transform.apply(&self.v2)])
            .expect("Edges always have vertices")
    }
}
