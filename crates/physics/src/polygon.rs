//! Convex polygons.
use arrayvec::ArrayVec;

use crate::errors::*;
use crate::*;

/// The most vertices a polygon may have.  Anything more detailed should be split or made into a chain.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// A convex polygon, with vertices stored counterclockwise in body space.
///
/// Normals are precomputed: `normals[i]` is the outward unit normal of the edge from `vertices[i]` to `vertices[i +
/// 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: ArrayVec<V2, MAX_POLYGON_VERTICES>,
    normals: ArrayVec<V2, MAX_POLYGON_VERTICES>,
}

impl Polygon {
    /// Build a polygon from its vertices, in either winding order.
    ///
    /// The vertices must already be the hull: this doesn't compute one, and rejects anything which isn't strictly
    /// convex.
    pub fn new(points: &[V2]) -> Result<Polygon, ShapeError> {
        if !(3..=MAX_POLYGON_VERTICES).contains(&points.len()) {
            return Err(ShapeError::InvalidVertexCount(points.len()));
        }

        if points.iter().any(|p| !p.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let mut vertices: ArrayVec<V2, MAX_POLYGON_VERTICES> = points.iter().copied().collect();

        let twice_area: f64 = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| a.cross(b))
            .sum();
        if twice_area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        let edges: ArrayVec<V2, MAX_POLYGON_VERTICES> =
            (0..n).map(|i| vertices[(i + 1) % n] - vertices[i]).collect();

        if let Some(i) = edges
            .iter()
            .position(|e| e.length_squared() < MIN_EDGE_LENGTH * MIN_EDGE_LENGTH)
        {
            return Err(ShapeError::DegenerateEdge(i));
        }

        let mut normals = ArrayVec::new();
        for (i, edge) in edges.iter().enumerate() {
            // Every other vertex has to be strictly to the left of this edge.
            let convex = (0..n)
                .filter(|j| *j != i && *j != (i + 1) % n)
                .all(|j| edge.cross(&(vertices[j] - vertices[i])) > 0.0);
            if !convex {
                return Err(ShapeError::NotConvex);
            }

            normals.push(edge.right_perp().normalize());
        }

        Ok(Polygon { vertices, normals })
    }

    /// An axis-aligned box centered on the body origin, extending `half_width` and `half_height` either way.
    pub fn new_box(half_width: f64, half_height: f64) -> Result<Polygon, ShapeError> {
        Polygon::new_oriented_box(half_width, half_height, V2::new(0.0, 0.0), 0.0)
    }

    /// A box centered on `center` in body space and rotated by `angle` about that center.
    pub fn new_oriented_box(
        half_width: f64,
        half_height: f64,
        center: V2,
        angle: f64,
    ) -> Result<Polygon, ShapeError> {
        let xf = Transform::new(center, angle);
        let corners = [
            V2::new(-half_width, -half_height),
            V2::new(half_width, -half_height),
            V2::new(half_width, half_height),
            V2::new(-half_width, half_height),
        ];
        Polygon::new(&corners.map(|c| xf.apply(&c)))
    }

    pub fn get_vertices(&self) -> &[V2] {
        &self.vertices
    }

    pub fn get_normals(&self) -> &[V2] {
        &self.normals
    }

    pub fn get_bounding_box(&self, transform: &Transform) -> Aabb {
        Aabb::enclosing(self.vertices.iter().map(|v| transform.apply(v)))
            .expect("Polygons always have vertices")
    }
}
