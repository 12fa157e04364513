//! Narrow phase ray tests: one per shape type, plus the box test used to walk the tree.
//!
//! Every test works against a [RayCastInput]: the original ray, plus the furthest fraction that is still
//! interesting.  Fractions in the output are always along the original ray, so they can be compared across shapes
//! and fed straight back in as the next bound.
use crate::*;

pub(crate) mod ray_aabb;
pub(crate) mod ray_circle;
pub(crate) mod ray_edge;
pub(crate) mod ray_polygon;

pub(crate) use ray_aabb::*;
pub(crate) use ray_circle::*;
pub(crate) use ray_edge::*;
pub(crate) use ray_polygon::*;

/// How far outside of a boundary, in fraction or edge-parameter space, an intersection may land and still count.
///
/// Keeps rays which graze a corner or an endpoint from slipping between neighboring shapes.
pub(crate) const RAY_EPSILON: f64 = 1e-9;

/// A ray plus the portion of it that is still being searched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayCastInput {
    pub ray: Ray,
    /// Hits beyond this fraction of `ray` are not reported.
    pub max_fraction: f64,
}

impl RayCastInput {
    pub fn new(ray: Ray, max_fraction: f64) -> RayCastInput {
        RayCastInput { ray, max_fraction }
    }

    /// The point at `max_fraction`, e.g. where the search currently stops.
    pub fn get_effective_target(&self) -> V2 {
        self.ray.evaluate(self.max_fraction)
    }

    /// Accept `t` if it is within the search window, allowing [RAY_EPSILON] of slack on both ends, and clamp it into
    /// the window.
    pub(crate) fn accept_fraction(&self, t: f64) -> Option<f64> {
        if t < -RAY_EPSILON || t > self.max_fraction + RAY_EPSILON {
            return None;
        }

        Some(t.clamp(0.0, self.max_fraction))
    }
}

/// The result of a successful ray test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayCastOutput {
    /// How far along the original ray the hit is.
    pub fraction: f64,
    /// Where did the ray hit the other shape?
    pub point: V2,
    /// Unit normal of the surface at `point`, pointing back toward the side the ray came from.
    pub normal: V2,
}
