//! A shape is one of the concrete shape types behind an enum for collision
//! detection.
use crate::raycasting::*;
use crate::*;

/// Edges shorter than this are rejected when building shapes.
pub const MIN_EDGE_LENGTH: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    Edge(Edge),
    Chain(Chain),
}

impl Shape {
    /// The tight world-space box of this shape when its body is at `transform`.
    pub fn get_bounding_box(&self, transform: &Transform) -> Aabb {
        match self {
            Shape::Circle(ref c) => c.get_bounding_box(transform),
            Shape::Polygon(ref p) => p.get_bounding_box(transform),
            Shape::Edge(ref e) => e.get_bounding_box(transform),
            Shape::Chain(ref c) => c.get_bounding_box(transform),
        }
    }

    /// Cast the searched part of a world-space ray against this shape when its body is at `transform`.
    pub fn raycast(&self, input: &RayCastInput, transform: &Transform) -> Option<RayCastOutput> {
        match self {
            Shape::Circle(ref c) => ray_circle_test(input, c, transform),
            Shape::Polygon(ref p) => ray_polygon_test(input, p, transform),
            Shape::Edge(ref e) => ray_edge_test(input, e, transform),
            Shape::Chain(ref c) => ray_chain_test(input, c, transform),
        }
    }
}

impl From<Circle> for Shape {
    fn from(other: Circle) -> Shape {
        Shape::Circle(other)
    }
}

impl From<Polygon> for Shape {
    fn from(other: Polygon) -> Shape {
        Shape::Polygon(other)
    }
}

impl From<Edge> for Shape {
    fn from(other: Edge) -> Shape {
        Shape::Edge(other)
    }
}

impl From<Chain> for Shape {
    fn from(other: Chain) -> Shape {
        Shape::Chain(other)
    }
}
