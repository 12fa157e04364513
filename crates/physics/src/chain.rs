//! Chains: polylines built out of many edges, used for terrain and level boundaries.
use crate::errors::*;
use crate::*;

/// A sequence of connected segments in body space.
///
/// A chain is not a solid: it is exactly its segments, each of which is two-sided.  If `closed`, there is an
/// additional segment from the last vertex back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    vertices: Vec<V2>,
    closed: bool,
}

impl Chain {
    /// A chain running from the first vertex to the last.
    pub fn new_open(vertices: Vec<V2>) -> Result<Chain, ShapeError> {
        Chain::new(vertices, false)
    }

    /// A chain which loops back to its first vertex.
    pub fn new_loop(vertices: Vec<V2>) -> Result<Chain, ShapeError> {
        Chain::new(vertices, true)
    }

    fn new(vertices: Vec<V2>, closed: bool) -> Result<Chain, ShapeError> {
        let needed = if closed { 3 } else { 2 };
        if vertices.len() < needed {
            return Err(ShapeError::ChainTooShort(needed, vertices.len()));
        }

        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let chain = Chain { vertices, closed };
        if let Some(i) = chain
            .iter_segments()
            .position(|(a, b)| a.distance_squared(b) < MIN_EDGE_LENGTH * MIN_EDGE_LENGTH)
        {
            return Err(ShapeError::DegenerateEdge(i));
        }

        Ok(chain)
    }

    pub fn get_vertices(&self) -> &[V2] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    /// Iterate over the segments of this chain as pairs of endpoints, in order.
    pub fn iter_segments(&self) -> impl Iterator<Item = (&V2, &V2)> {
        let n = self.vertices.len();
        (0..self.segment_count()).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    pub fn get_bounding_box(&self, transform: &Transform) -> Aabb {
        Aabb::enclosing(self.vertices.iter().map(|v| transform.apply(v)))
            .expect("Chains always have vertices")
    }
}
